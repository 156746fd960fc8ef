//! Typed numeric view kinds.

/// The closed set of typed numeric windows a view value may take over a raw
/// buffer. The canonical name is the text form both ends of a deployment
/// agree on; it travels on the wire as an ordinary encoded text value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
    BigInt64,
    BigUint64,
    DataView,
}

impl ViewKind {
    /// Canonical wire name of this view kind.
    pub fn name(&self) -> &'static str {
        match self {
            ViewKind::Int8 => "Int8Array",
            ViewKind::Uint8 => "Uint8Array",
            ViewKind::Uint8Clamped => "Uint8ClampedArray",
            ViewKind::Int16 => "Int16Array",
            ViewKind::Uint16 => "Uint16Array",
            ViewKind::Int32 => "Int32Array",
            ViewKind::Uint32 => "Uint32Array",
            ViewKind::Float32 => "Float32Array",
            ViewKind::Float64 => "Float64Array",
            ViewKind::BigInt64 => "BigInt64Array",
            ViewKind::BigUint64 => "BigUint64Array",
            ViewKind::DataView => "DataView",
        }
    }

    /// Resolves a canonical wire name back to its kind.
    pub fn from_name(name: &str) -> Option<ViewKind> {
        Some(match name {
            "Int8Array" => ViewKind::Int8,
            "Uint8Array" => ViewKind::Uint8,
            "Uint8ClampedArray" => ViewKind::Uint8Clamped,
            "Int16Array" => ViewKind::Int16,
            "Uint16Array" => ViewKind::Uint16,
            "Int32Array" => ViewKind::Int32,
            "Uint32Array" => ViewKind::Uint32,
            "Float32Array" => ViewKind::Float32,
            "Float64Array" => ViewKind::Float64,
            "BigInt64Array" => ViewKind::BigInt64,
            "BigUint64Array" => ViewKind::BigUint64,
            "DataView" => ViewKind::DataView,
            _ => return None,
        })
    }

    /// Width of one element in bytes. `DataView` is byte-addressed.
    pub fn bytes_per_element(&self) -> usize {
        match self {
            ViewKind::Int8 | ViewKind::Uint8 | ViewKind::Uint8Clamped | ViewKind::DataView => 1,
            ViewKind::Int16 | ViewKind::Uint16 => 2,
            ViewKind::Int32 | ViewKind::Uint32 | ViewKind::Float32 => 4,
            ViewKind::Float64 | ViewKind::BigInt64 | ViewKind::BigUint64 => 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ViewKind; 12] = [
        ViewKind::Int8,
        ViewKind::Uint8,
        ViewKind::Uint8Clamped,
        ViewKind::Int16,
        ViewKind::Uint16,
        ViewKind::Int32,
        ViewKind::Uint32,
        ViewKind::Float32,
        ViewKind::Float64,
        ViewKind::BigInt64,
        ViewKind::BigUint64,
        ViewKind::DataView,
    ];

    #[test]
    fn test_name_bijection() {
        for kind in ALL {
            assert_eq!(ViewKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(ViewKind::from_name("Float16Array"), None);
    }

    #[test]
    fn test_element_widths() {
        assert_eq!(ViewKind::Uint8.bytes_per_element(), 1);
        assert_eq!(ViewKind::Int16.bytes_per_element(), 2);
        assert_eq!(ViewKind::Float32.bytes_per_element(), 4);
        assert_eq!(ViewKind::BigUint64.bytes_per_element(), 8);
    }
}
