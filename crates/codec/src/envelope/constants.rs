// One-byte tags of the envelope format. Distinct purpose from the deep
// format's kind tags; only the two ends of one deployment need to agree.
pub const BUFFER: u8 = 0x01;
pub const VIEW: u8 = 0x02;
pub const TEXT: u8 = 0x03;
pub const DIRECT: u8 = 0x04;
pub const ERROR: u8 = 0x05;

/// Marker bit of the small-integer fast path. Any tag carrying this bit —
/// and any tag outside the structural set above — travels as
/// `[tag][int32-le]`, five bytes total, no length field.
pub const REMOTE: u8 = 0x80;
