use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::io::Read;
use std::path::PathBuf;

/// Значение аргумента: "hex:..." → байты, иначе UTF-8 литерал.
pub fn decode_bytes_arg(arg: &str) -> Result<Vec<u8>> {
    if let Some(hx) = arg.strip_prefix("hex:") {
        return decode_hex(hx);
    }
    Ok(arg.as_bytes().to_vec())
}

pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    if s.len() % 2 != 0 {
        return Err(anyhow!("hex string must have even length"));
    }
    let mut out = Vec::with_capacity(s.len() / 2);
    let bytes = s.as_bytes();
    for i in (0..bytes.len()).step_by(2) {
        let h = (bytes[i] as char)
            .to_digit(16)
            .ok_or_else(|| anyhow!("invalid hex at pos {}", i))?;
        let l = (bytes[i + 1] as char)
            .to_digit(16)
            .ok_or_else(|| anyhow!("invalid hex at pos {}", i + 1))?;
        out.push(((h << 4) | l) as u8);
    }
    Ok(out)
}

pub fn display_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => format!("hex:{}", to_hex(bytes)),
    }
}

pub fn to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

pub fn read_all(p: &PathBuf) -> Result<Vec<u8>> {
    let mut f = OpenOptions::new()
        .read(true)
        .open(p)
        .with_context(|| format!("open {}", p.display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Простой детерминированный PRNG (SplitMix64). Не криптостойкий.
#[derive(Clone)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Буквенно-цифровые байты заданной длины.
    pub fn alnum(&mut self, len: usize) -> Vec<u8> {
        const ABC: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
        (0..len)
            .map(|_| ABC[(self.next_u64() % ABC.len() as u64) as usize])
            .collect()
    }
}
