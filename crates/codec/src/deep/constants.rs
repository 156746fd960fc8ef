// One-byte kind tags of the deep wire format. Both ends of a deployment
// share these exact values; there is no cross-version negotiation.
pub const FALSE: u8 = 0x00;
pub const TRUE: u8 = 0x01;
pub const NULL: u8 = 0x02;
pub const UNDEFINED: u8 = 0x03;
pub const NAN: u8 = 0x04;
pub const POS_INFINITY: u8 = 0x05;
pub const NEG_INFINITY: u8 = 0x06;
pub const POS_ZERO: u8 = 0x07;
pub const NEG_ZERO: u8 = 0x08;
pub const FLOAT64: u8 = 0x09;
pub const INT64: u8 = 0x0a;
pub const UINT64: u8 = 0x0b;
pub const STR: u8 = 0x0c;
pub const TOKEN: u8 = 0x0d;
pub const LIST: u8 = 0x0e;
pub const RECORD: u8 = 0x0f;
pub const MAP: u8 = 0x10;
pub const SET: u8 = 0x11;
pub const BUFFER: u8 = 0x12;
pub const VIEW: u8 = 0x13;
pub const DATE: u8 = 0x14;
pub const ERROR: u8 = 0x15;
pub const PATTERN: u8 = 0x16;
pub const BACKREF: u8 = 0x17;
