use declio::ctx::Endian;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    // Host native byte order; the compiler additionally inserts host-ABI
    // alignment padding between and after fields, so total width becomes
    // host-dependent. Discouraged outside of matching a specific compiler's
    // `#[repr(C)]` layout.
    NativeAligned,
    Native,
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    pub const NETWORK: ByteOrder = ByteOrder::BigEndian;

    pub(crate) fn declio_endian(self) -> Endian {
        match self {
            ByteOrder::BigEndian => Endian::Big,
            ByteOrder::LittleEndian => Endian::Little,
            ByteOrder::Native | ByteOrder::NativeAligned => {
                if cfg!(target_endian = "big") {
                    Endian::Big
                } else {
                    Endian::Little
                }
            }
        }
    }

    pub(crate) fn aligns(self) -> bool {
        matches!(self, ByteOrder::NativeAligned)
    }
}
