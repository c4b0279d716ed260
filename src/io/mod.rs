pub mod fasta;
pub mod results;
