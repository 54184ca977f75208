use std::fmt;
use num_enum::TryFromPrimitive;

/// Debug name of the variant for `raw`, or `0x..` when no variant matches.
pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

/// Compressed-to-raw ratio; 0 when nothing was compressed.
pub fn ratio(compressed: u64, raw: u64) -> f64 {
    if raw > 0 {
        compressed as f64 / raw as f64
    } else {
        0.0
    }
}
