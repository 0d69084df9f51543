//! Script tokenizer, standard-output classifier, and script builders

use crate::constants::MAX_SCRIPT_SIZE;
use crate::error::{CodecError, Result};
use crate::types::ByteString;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! opcodes {
    ($($name:ident = $byte:literal, $text:literal;)*) => {
        /// A single script instruction byte.
        ///
        /// Push instructions (bytes 0x01-0x4e) never appear here; the
        /// tokenizer consumes them together with their data and emits a
        /// [`Token::Push`] instead.
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum Opcode {
            $($name = $byte,)*
        }

        impl Opcode {
            /// Look up a byte in the fixed opcode table
            pub fn from_byte(byte: u8) -> Option<Opcode> {
                match byte {
                    $($byte => Some(Opcode::$name),)*
                    _ => None,
                }
            }

            /// Canonical opcode name, e.g. `OP_DUP`
            pub fn name(&self) -> &'static str {
                match self {
                    $(Opcode::$name => $text,)*
                }
            }
        }
    };
}

opcodes! {
    Op0 = 0x00, "OP_0";
    OpPushData1 = 0x4c, "OP_PUSHDATA1";
    OpPushData2 = 0x4d, "OP_PUSHDATA2";
    OpPushData4 = 0x4e, "OP_PUSHDATA4";
    Op1Negate = 0x4f, "OP_1NEGATE";
    OpReserved = 0x50, "OP_RESERVED";
    Op1 = 0x51, "OP_1";
    Op2 = 0x52, "OP_2";
    Op3 = 0x53, "OP_3";
    Op4 = 0x54, "OP_4";
    Op5 = 0x55, "OP_5";
    Op6 = 0x56, "OP_6";
    Op7 = 0x57, "OP_7";
    Op8 = 0x58, "OP_8";
    Op9 = 0x59, "OP_9";
    Op10 = 0x5a, "OP_10";
    Op11 = 0x5b, "OP_11";
    Op12 = 0x5c, "OP_12";
    Op13 = 0x5d, "OP_13";
    Op14 = 0x5e, "OP_14";
    Op15 = 0x5f, "OP_15";
    Op16 = 0x60, "OP_16";
    OpNop = 0x61, "OP_NOP";
    OpVer = 0x62, "OP_VER";
    OpIf = 0x63, "OP_IF";
    OpNotIf = 0x64, "OP_NOTIF";
    OpVerIf = 0x65, "OP_VERIF";
    OpVerNotIf = 0x66, "OP_VERNOTIF";
    OpElse = 0x67, "OP_ELSE";
    OpEndIf = 0x68, "OP_ENDIF";
    OpVerify = 0x69, "OP_VERIFY";
    OpReturn = 0x6a, "OP_RETURN";
    OpToAltStack = 0x6b, "OP_TOALTSTACK";
    OpFromAltStack = 0x6c, "OP_FROMALTSTACK";
    Op2Drop = 0x6d, "OP_2DROP";
    Op2Dup = 0x6e, "OP_2DUP";
    Op3Dup = 0x6f, "OP_3DUP";
    Op2Over = 0x70, "OP_2OVER";
    Op2Rot = 0x71, "OP_2ROT";
    Op2Swap = 0x72, "OP_2SWAP";
    OpIfDup = 0x73, "OP_IFDUP";
    OpDepth = 0x74, "OP_DEPTH";
    OpDrop = 0x75, "OP_DROP";
    OpDup = 0x76, "OP_DUP";
    OpNip = 0x77, "OP_NIP";
    OpOver = 0x78, "OP_OVER";
    OpPick = 0x79, "OP_PICK";
    OpRoll = 0x7a, "OP_ROLL";
    OpRot = 0x7b, "OP_ROT";
    OpSwap = 0x7c, "OP_SWAP";
    OpTuck = 0x7d, "OP_TUCK";
    OpCat = 0x7e, "OP_CAT";
    OpSplit = 0x7f, "OP_SPLIT";
    OpNum2Bin = 0x80, "OP_NUM2BIN";
    OpBin2Num = 0x81, "OP_BIN2NUM";
    OpSize = 0x82, "OP_SIZE";
    OpInvert = 0x83, "OP_INVERT";
    OpAnd = 0x84, "OP_AND";
    OpOr = 0x85, "OP_OR";
    OpXor = 0x86, "OP_XOR";
    OpEqual = 0x87, "OP_EQUAL";
    OpEqualVerify = 0x88, "OP_EQUALVERIFY";
    OpReserved1 = 0x89, "OP_RESERVED1";
    OpReserved2 = 0x8a, "OP_RESERVED2";
    Op1Add = 0x8b, "OP_1ADD";
    Op1Sub = 0x8c, "OP_1SUB";
    Op2Mul = 0x8d, "OP_2MUL";
    Op2Div = 0x8e, "OP_2DIV";
    OpNegate = 0x8f, "OP_NEGATE";
    OpAbs = 0x90, "OP_ABS";
    OpNot = 0x91, "OP_NOT";
    Op0NotEqual = 0x92, "OP_0NOTEQUAL";
    OpAdd = 0x93, "OP_ADD";
    OpSub = 0x94, "OP_SUB";
    OpMul = 0x95, "OP_MUL";
    OpDiv = 0x96, "OP_DIV";
    OpMod = 0x97, "OP_MOD";
    OpLShift = 0x98, "OP_LSHIFT";
    OpRShift = 0x99, "OP_RSHIFT";
    OpBoolAnd = 0x9a, "OP_BOOLAND";
    OpBoolOr = 0x9b, "OP_BOOLOR";
    OpNumEqual = 0x9c, "OP_NUMEQUAL";
    OpNumEqualVerify = 0x9d, "OP_NUMEQUALVERIFY";
    OpNumNotEqual = 0x9e, "OP_NUMNOTEQUAL";
    OpLessThan = 0x9f, "OP_LESSTHAN";
    OpGreaterThan = 0xa0, "OP_GREATERTHAN";
    OpLessThanOrEqual = 0xa1, "OP_LESSTHANOREQUAL";
    OpGreaterThanOrEqual = 0xa2, "OP_GREATERTHANOREQUAL";
    OpMin = 0xa3, "OP_MIN";
    OpMax = 0xa4, "OP_MAX";
    OpWithin = 0xa5, "OP_WITHIN";
    OpRipemd160 = 0xa6, "OP_RIPEMD160";
    OpSha1 = 0xa7, "OP_SHA1";
    OpSha256 = 0xa8, "OP_SHA256";
    OpHash160 = 0xa9, "OP_HASH160";
    OpHash256 = 0xaa, "OP_HASH256";
    OpCodeSeparator = 0xab, "OP_CODESEPARATOR";
    OpCheckSig = 0xac, "OP_CHECKSIG";
    OpCheckSigVerify = 0xad, "OP_CHECKSIGVERIFY";
    OpCheckMultiSig = 0xae, "OP_CHECKMULTISIG";
    OpCheckMultiSigVerify = 0xaf, "OP_CHECKMULTISIGVERIFY";
    OpNop1 = 0xb0, "OP_NOP1";
    OpCheckLockTimeVerify = 0xb1, "OP_CHECKLOCKTIMEVERIFY";
    OpCheckSequenceVerify = 0xb2, "OP_CHECKSEQUENCEVERIFY";
    OpNop4 = 0xb3, "OP_NOP4";
    OpNop5 = 0xb4, "OP_NOP5";
    OpNop6 = 0xb5, "OP_NOP6";
    OpNop7 = 0xb6, "OP_NOP7";
    OpNop8 = 0xb7, "OP_NOP8";
    OpNop9 = 0xb8, "OP_NOP9";
    OpNop10 = 0xb9, "OP_NOP10";
    OpCheckDataSig = 0xba, "OP_CHECKDATASIG";
    OpCheckDataSigVerify = 0xbb, "OP_CHECKDATASIGVERIFY";
    OpReverseBytes = 0xbc, "OP_REVERSEBYTES";
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One element of a tokenized script: either a table opcode or the
/// sentinel for a data push.
///
/// Every `Push` token is paired, in order, with one entry of the script's
/// data-chunk list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    Push,
    Code(Opcode),
}

/// A decoded script: the raw bytes plus the parallel token and data-chunk
/// lists produced by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    bytes: ByteString,
    tokens: Vec<Token>,
    chunks: Vec<ByteString>,
}

impl Script {
    /// Tokenize a raw script buffer.
    ///
    /// Scans left to right: bytes 1-75 push that many following bytes,
    /// OP_PUSHDATA1/2/4 push a length given by the next 1/2/4 bytes
    /// (little-endian), anything else is looked up in the opcode table.
    /// An unrecognized byte is a fatal decode error; the scan always jumps
    /// over consumed data so opcode bytes are never re-read as data.
    pub fn parse(bytes: impl Into<ByteString>) -> Result<Self> {
        let bytes = bytes.into();
        match Self::tokenize(&bytes) {
            Ok((tokens, chunks)) => Ok(Self {
                bytes,
                tokens,
                chunks,
            }),
            Err(e) => Err(CodecError::Script(Box::new(e))),
        }
    }

    fn tokenize(bytes: &[u8]) -> Result<(Vec<Token>, Vec<ByteString>)> {
        let mut cursor = crate::cursor::ByteCursor::new(bytes);
        let mut tokens = Vec::new();
        let mut chunks = Vec::new();

        while !cursor.is_at_end() {
            let offset = cursor.position();
            let byte = cursor.read_u8()?;
            match byte {
                1..=75 => {
                    chunks.push(cursor.read_slice(byte as usize)?.to_vec());
                    tokens.push(Token::Push);
                }
                0x4c => {
                    let len = cursor.read_u8()? as usize;
                    chunks.push(cursor.read_slice(len)?.to_vec());
                    tokens.push(Token::Push);
                }
                0x4d => {
                    let len = cursor.read_u16()? as usize;
                    chunks.push(cursor.read_slice(len)?.to_vec());
                    tokens.push(Token::Push);
                }
                0x4e => {
                    let len = cursor.read_u32()? as usize;
                    chunks.push(cursor.read_slice(len)?.to_vec());
                    tokens.push(Token::Push);
                }
                other => match Opcode::from_byte(other) {
                    Some(op) => tokens.push(Token::Code(op)),
                    None => return Err(CodecError::UnknownOpcode { byte: other, offset }),
                },
            }
        }

        Ok((tokens, chunks))
    }

    /// Raw script bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Ordered token list, one entry per opcode or push
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Data chunks pushed by the script, in push order
    pub fn chunks(&self) -> &[ByteString] {
        &self.chunks
    }

    /// Raw script as lowercase hex
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Display for Script {
    /// Human-readable script with pushed data rendered as hex
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chunks = self.chunks.iter();
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match token {
                Token::Code(op) => write!(f, "{op}")?,
                Token::Push => {
                    let chunk = chunks.next().map(hex::encode).unwrap_or_default();
                    f.write_str(&chunk)?;
                }
            }
        }
        Ok(())
    }
}

/// Standard output pattern a locking script matches, with the fields that
/// pattern defines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptClass {
    /// `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG`
    KeyHash { hash: ByteString },
    /// `OP_HASH160 <hash> OP_EQUAL`
    ScriptHash { hash: ByteString },
    /// `OP_RETURN ...`; remaining chunks are application payload
    NullData,
    /// Anything else; no address is derivable
    Other,
}

/// Classify a tokenized script against the standard output patterns
pub fn classify(script: &Script) -> ScriptClass {
    let tokens = script.tokens();

    if let Some(Token::Code(Opcode::OpReturn)) = tokens.first() {
        return ScriptClass::NullData;
    }

    match tokens {
        [Token::Code(Opcode::OpDup), Token::Code(Opcode::OpHash160), Token::Push, Token::Code(Opcode::OpEqualVerify), Token::Code(Opcode::OpCheckSig)] => {
            ScriptClass::KeyHash {
                hash: script.chunks()[0].clone(),
            }
        }
        [Token::Code(Opcode::OpHash160), Token::Push, Token::Code(Opcode::OpEqual)] => {
            ScriptClass::ScriptHash {
                hash: script.chunks()[0].clone(),
            }
        }
        _ => ScriptClass::Other,
    }
}

/// How a zero-length push should be spelled by the builders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroPush {
    /// The dedicated empty-push opcode, `OP_0`
    Op0,
    /// An explicit `OP_PUSHDATA1 0x00` (protocols like SLP require a
    /// countable push token even for empty fields)
    PushData1,
}

/// Opcode bytes that push `len` bytes of following data, using the
/// minimal form: 1-75 direct, up to 254 OP_PUSHDATA1, up to 65534
/// OP_PUSHDATA2, otherwise OP_PUSHDATA4 (multi-byte lengths little-endian)
pub fn push_for_len(len: usize, zero_push: ZeroPush) -> Vec<u8> {
    match len {
        0 => match zero_push {
            ZeroPush::Op0 => vec![Opcode::Op0 as u8],
            ZeroPush::PushData1 => vec![Opcode::OpPushData1 as u8, 0],
        },
        1..=75 => vec![len as u8],
        76..=254 => vec![Opcode::OpPushData1 as u8, len as u8],
        255..=65534 => {
            let mut out = vec![Opcode::OpPushData2 as u8];
            out.extend_from_slice(&(len as u16).to_le_bytes());
            out
        }
        _ => {
            let mut out = vec![Opcode::OpPushData4 as u8];
            out.extend_from_slice(&(len as u32).to_le_bytes());
            out
        }
    }
}

/// Build the canonical pay-to-key-hash locking script for a hash
pub fn pay_to_key_hash(hash: &[u8]) -> Result<Script> {
    let mut bytes = vec![Opcode::OpDup as u8, Opcode::OpHash160 as u8];
    bytes.extend_from_slice(&push_for_len(hash.len(), ZeroPush::Op0));
    bytes.extend_from_slice(hash);
    bytes.push(Opcode::OpEqualVerify as u8);
    bytes.push(Opcode::OpCheckSig as u8);
    Script::parse(bytes)
}

/// Build the canonical pay-to-script-hash locking script for a hash
pub fn pay_to_script_hash(hash: &[u8]) -> Result<Script> {
    let mut bytes = vec![Opcode::OpHash160 as u8];
    bytes.extend_from_slice(&push_for_len(hash.len(), ZeroPush::Op0));
    bytes.extend_from_slice(hash);
    bytes.push(Opcode::OpEqual as u8);
    Script::parse(bytes)
}

/// Build the locking script that pays a cash address
pub fn output_script_for_address(address: &str) -> Result<Script> {
    let decoded = crate::address::decode_address(address)?;
    match decoded.kind {
        crate::address::AddressType::KeyHash => pay_to_key_hash(&decoded.hash),
        crate::address::AddressType::ScriptHash => pay_to_script_hash(&decoded.hash),
    }
}

/// Build an OP_RETURN data-carrier script, pushing each chunk with the
/// minimal push opcode
pub fn null_data(chunks: &[&[u8]], zero_push: ZeroPush) -> Result<Script> {
    let mut bytes = vec![Opcode::OpReturn as u8];
    for chunk in chunks {
        bytes.extend_from_slice(&push_for_len(chunk.len(), zero_push));
        bytes.extend_from_slice(chunk);
    }
    if bytes.len() > MAX_SCRIPT_SIZE {
        return Err(CodecError::Script(Box::new(CodecError::OversizedLength {
            len: bytes.len() as u64,
            max: MAX_SCRIPT_SIZE as u64,
        })));
    }
    Script::parse(bytes)
}
