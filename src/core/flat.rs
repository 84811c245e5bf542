//! Flat - bit-level walker for untyped Plutus Core programs
//!
//! Parameterizing a validator means wrapping its program in
//! `Apply(term, Constant(Data(param)))`. The walker only has to find where
//! the term ends; terms are skipped, never materialized.
//!
//! # Layout
//!
//! ```text
//! program  = version(3 naturals) term filler
//! term     = tag(4 bits) payload
//! filler   = 0* 1              (up to the next byte boundary)
//! natural  = (1 xxxxxxx)* 0 xxxxxxx
//! list     = (1 item)* 0
//! ```

use thiserror::Error;

const TERM_VAR: u64 = 0;
const TERM_DELAY: u64 = 1;
const TERM_LAMBDA: u64 = 2;
const TERM_APPLY: u64 = 3;
const TERM_CONSTANT: u64 = 4;
const TERM_FORCE: u64 = 5;
const TERM_ERROR: u64 = 6;
const TERM_BUILTIN: u64 = 7;
const TERM_CONSTR: u64 = 8;
const TERM_CASE: u64 = 9;

const TYPE_DATA: u64 = 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlatError {
    #[error("unexpected end of program at bit {0}")]
    Eof(usize),
    #[error("unknown term tag {tag} at bit {pos}")]
    TermTag { tag: u64, pos: usize },
    #[error("unsupported constant type: {0}")]
    ConstantType(String),
    #[error("malformed constant type list")]
    TypeList,
    #[error("program does not end with filler at bit {0}")]
    Padding(usize),
}

pub type FlatResult<T> = Result<T, FlatError>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ConstType {
    Integer,
    ByteString,
    String,
    Unit,
    Bool,
    Data,
    List(Box<ConstType>),
    Pair(Box<ConstType>, Box<ConstType>),
}

struct BitReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn bit(&mut self) -> FlatResult<bool> {
        let byte = self.bytes.get(self.pos / 8).ok_or(FlatError::Eof(self.pos))?;
        let bit = (byte >> (7 - self.pos % 8)) & 1 == 1;
        self.pos += 1;
        Ok(bit)
    }

    fn bits(&mut self, n: u8) -> FlatResult<u64> {
        let mut value = 0u64;
        for _ in 0..n {
            value = (value << 1) | u64::from(self.bit()?);
        }
        Ok(value)
    }

    fn skip(&mut self, n: usize) -> FlatResult<()> {
        if self.pos + n > self.bytes.len() * 8 {
            return Err(FlatError::Eof(self.bytes.len() * 8));
        }
        self.pos += n;
        Ok(())
    }

    /// Skip a variable-length natural. Integers may exceed any native width.
    fn skip_natural(&mut self) -> FlatResult<()> {
        while self.bits(8)? & 0x80 != 0 {}
        Ok(())
    }

    fn filler(&mut self) -> FlatResult<()> {
        while !self.bit()? {}
        Ok(())
    }

    fn skip_bytestring(&mut self) -> FlatResult<()> {
        self.filler()?;
        loop {
            let chunk = self.bits(8)? as usize;
            if chunk == 0 {
                return Ok(());
            }
            self.skip(chunk * 8)?;
        }
    }

    fn constant_type(&mut self) -> FlatResult<ConstType> {
        let mut tags = Vec::new();
        while self.bit()? {
            tags.push(self.bits(4)?);
        }
        let mut iter = tags.into_iter();
        let ty = parse_type(&mut iter)?;
        if iter.next().is_some() {
            return Err(FlatError::TypeList);
        }
        Ok(ty)
    }

    fn skip_value(&mut self, ty: &ConstType) -> FlatResult<()> {
        match ty {
            ConstType::Integer => self.skip_natural(),
            ConstType::ByteString | ConstType::String | ConstType::Data => self.skip_bytestring(),
            ConstType::Unit => Ok(()),
            ConstType::Bool => self.bit().map(|_| ()),
            ConstType::List(item) => {
                while self.bit()? {
                    self.skip_value(item)?;
                }
                Ok(())
            }
            ConstType::Pair(first, second) => {
                self.skip_value(first)?;
                self.skip_value(second)
            }
        }
    }

    fn skip_term(&mut self) -> FlatResult<()> {
        let pos = self.pos;
        match self.bits(4)? {
            TERM_VAR => self.skip_natural(),
            TERM_DELAY | TERM_LAMBDA | TERM_FORCE => self.skip_term(),
            TERM_APPLY => {
                self.skip_term()?;
                self.skip_term()
            }
            TERM_CONSTANT => {
                let ty = self.constant_type()?;
                self.skip_value(&ty)
            }
            TERM_ERROR => Ok(()),
            TERM_BUILTIN => self.skip(7),
            TERM_CONSTR => {
                self.skip_natural()?;
                self.skip_term_list()
            }
            TERM_CASE => {
                self.skip_term()?;
                self.skip_term_list()
            }
            tag => Err(FlatError::TermTag { tag, pos }),
        }
    }

    fn skip_term_list(&mut self) -> FlatResult<()> {
        while self.bit()? {
            self.skip_term()?;
        }
        Ok(())
    }
}

fn parse_type(tags: &mut impl Iterator<Item = u64>) -> FlatResult<ConstType> {
    Ok(match tags.next().ok_or(FlatError::TypeList)? {
        0 => ConstType::Integer,
        1 => ConstType::ByteString,
        2 => ConstType::String,
        3 => ConstType::Unit,
        4 => ConstType::Bool,
        8 => ConstType::Data,
        7 => match tags.next() {
            Some(5) => ConstType::List(Box::new(parse_type(tags)?)),
            Some(7) => match tags.next() {
                Some(6) => {
                    let first = parse_type(tags)?;
                    let second = parse_type(tags)?;
                    ConstType::Pair(Box::new(first), Box::new(second))
                }
                _ => return Err(FlatError::TypeList),
            },
            _ => return Err(FlatError::TypeList),
        },
        9 | 10 | 11 => return Err(FlatError::ConstantType("bls12-381 values have no flat encoding".into())),
        other => return Err(FlatError::ConstantType(format!("tag {}", other))),
    })
}

#[derive(Default)]
struct BitWriter {
    bytes: Vec<u8>,
    len: usize,
}

impl BitWriter {
    fn bit(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 1 << (7 - self.len % 8);
        }
        self.len += 1;
    }

    fn bits(&mut self, value: u64, n: u8) {
        for i in (0..n).rev() {
            self.bit((value >> i) & 1 == 1);
        }
    }

    fn copy(&mut self, src: &[u8], from: usize, to: usize) {
        for pos in from..to {
            self.bit((src[pos / 8] >> (7 - pos % 8)) & 1 == 1);
        }
    }

    fn filler(&mut self) {
        while self.len % 8 != 7 {
            self.bit(false);
        }
        self.bit(true);
    }

    fn bytestring(&mut self, data: &[u8]) {
        self.filler();
        for chunk in data.chunks(255) {
            self.bits(chunk.len() as u64, 8);
            for &byte in chunk {
                self.bits(u64::from(byte), 8);
            }
        }
        self.bits(0, 8);
    }

    fn finish(mut self) -> Vec<u8> {
        self.filler();
        self.bytes
    }
}

/// Bit span of the top-level term inside a flat program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSpan {
    pub start: usize,
    pub end: usize,
}

/// Walk a whole program and check it ends exactly on its filler.
pub fn term_span(program: &[u8]) -> FlatResult<TermSpan> {
    let mut reader = BitReader::new(program);
    for _ in 0..3 {
        reader.skip_natural()?;
    }
    let start = reader.pos;
    reader.skip_term()?;
    let end = reader.pos;
    reader.filler()?;
    if reader.pos != program.len() * 8 {
        return Err(FlatError::Padding(reader.pos));
    }
    Ok(TermSpan { start, end })
}

/// Wrap `program` in an application to a `Data` constant given as CBOR.
pub fn apply_data(program: &[u8], data_cbor: &[u8]) -> FlatResult<Vec<u8>> {
    let span = term_span(program)?;
    let mut writer = BitWriter::default();
    writer.copy(program, 0, span.start);
    writer.bits(TERM_APPLY, 4);
    writer.copy(program, span.start, span.end);
    writer.bits(TERM_CONSTANT, 4);
    writer.bit(true);
    writer.bits(TYPE_DATA, 4);
    writer.bit(false);
    writer.bytestring(data_cbor);
    Ok(writer.finish())
}
