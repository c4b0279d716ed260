use std::fmt;

use crate::error::{Error, Result};
use crate::util::dna::WILDCARD;

/// PAM 模式：由 {A,C,G,T,N} 组成，'N' 匹配任意碱基。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PamPattern {
    pattern: Vec<u8>,
}

impl PamPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = pattern.trim().to_ascii_uppercase().into_bytes();
        if pattern.is_empty() {
            return Err(Error::InvalidInput("PAM pattern must not be empty".to_string()));
        }
        if let Some(&bad) = pattern
            .iter()
            .find(|b| !matches!(b, b'A' | b'C' | b'G' | b'T' | b'N'))
        {
            return Err(Error::InvalidInput(format!(
                "PAM pattern contains unsupported symbol '{}'",
                bad as char
            )));
        }
        Ok(Self { pattern })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pattern
    }

    pub fn as_str(&self) -> &str {
        // construction only admits ASCII
        std::str::from_utf8(&self.pattern).unwrap_or_default()
    }

    #[inline]
    pub fn matches(&self, window: &[u8]) -> bool {
        matches(window, &self.pattern)
    }
}

impl fmt::Display for PamPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 判断窗口是否满足 PAM 模式。长度不一致（例如窗口越过序列末端）时直接返回 false。
#[inline]
pub fn matches(window: &[u8], pattern: &[u8]) -> bool {
    if window.len() != pattern.len() {
        return false;
    }
    window.iter().zip(pattern).all(|(&w, &p)| {
        let p = p.to_ascii_uppercase();
        p == WILDCARD || w.to_ascii_uppercase() == p
    })
}
