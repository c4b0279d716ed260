use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};
use crate::search::ReferenceSequence;

/// 流式读取参考 FASTA。序列统一转为大写，软屏蔽（小写）区域照常参与扫描。
pub struct FastaReader<R: BufRead> {
    reader: R,
    line: String,
    pending: Option<String>,
    eof: bool,
}

/// `>id description` 拆为 id 与可选描述。
fn split_header(header: &str) -> (String, Option<String>) {
    match header.split_once(char::is_whitespace) {
        Some((id, rest)) => {
            let rest = rest.trim();
            (id.to_string(), (!rest.is_empty()).then(|| rest.to_string()))
        }
        None => (header.to_string(), None),
    }
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            pending: None,
            eof: false,
        }
    }

    /// Reads one line into `self.line`; `false` at end of input.
    fn advance(&mut self) -> Result<bool> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            self.eof = true;
            return Ok(false);
        }
        Ok(true)
    }

    fn header_line(&self) -> Option<String> {
        self.line.strip_prefix('>').map(|h| h.trim().to_string())
    }

    pub fn next_record(&mut self) -> Result<Option<ReferenceSequence>> {
        let header = match self.pending.take() {
            Some(h) => h,
            None => loop {
                if self.eof || !self.advance()? {
                    return Ok(None);
                }
                // 跳过首条记录之前的空行或杂项
                if let Some(h) = self.header_line() {
                    break h;
                }
            },
        };
        let (id, desc) = split_header(&header);

        let mut seq = Vec::new();
        while self.advance()? {
            if let Some(h) = self.header_line() {
                self.pending = Some(h);
                break;
            }
            seq.extend(
                self.line
                    .bytes()
                    .filter(|b| !b.is_ascii_whitespace())
                    .map(|b| b.to_ascii_uppercase()),
            );
        }

        Ok(Some(ReferenceSequence { id, desc, seq }))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<ReferenceSequence>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Read every record of a FASTA file into memory.
pub fn read_references(path: &Path) -> Result<Vec<ReferenceSequence>> {
    if !path.is_file() {
        return Err(Error::MissingResource(path.to_path_buf()));
    }
    let fh = File::open(path)?;
    FastaReader::new(BufReader::new(fh)).collect()
}
