//! Binary contract for the kernel's argument block.

use vx_device::DeviceAddr;

/// Fixed device address the argument block is written to. The kernel reads
/// its arguments from this location at startup.
pub const KERNEL_ARG_DEV_ADDR: DeviceAddr = DeviceAddr::new(0x7fff_f000);

/// Arguments handed to the kernel: the three buffer addresses and two
/// scalars describing the job.
///
/// The wire layout is fixed by the kernel binary and not negotiated:
/// little-endian, the three addresses first, then `size` and `num_tasks`,
/// 32 bytes total. [`KernelArgs::pack`] is the single encoder for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelArgs {
    pub a_addr: DeviceAddr,
    pub b_addr: DeviceAddr,
    pub c_addr: DeviceAddr,
    pub size: u32,
    pub num_tasks: u32,
}

impl KernelArgs {
    /// Size of the packed block in bytes.
    pub const PACKED_LEN: usize = 32;

    /// Serialize into the exact byte image the kernel expects.
    pub fn pack(&self) -> [u8; Self::PACKED_LEN] {
        let mut out = [0u8; Self::PACKED_LEN];
        out[0..8].copy_from_slice(&self.a_addr.as_u64().to_le_bytes());
        out[8..16].copy_from_slice(&self.b_addr.as_u64().to_le_bytes());
        out[16..24].copy_from_slice(&self.c_addr.as_u64().to_le_bytes());
        out[24..28].copy_from_slice(&self.size.to_le_bytes());
        out[28..32].copy_from_slice(&self.num_tasks.to_le_bytes());
        out
    }

    /// Decode an argument block, the exact inverse of [`KernelArgs::pack`].
    ///
    /// This is the read the kernel performs on its side of the contract.
    pub fn unpack(bytes: &[u8; Self::PACKED_LEN]) -> Self {
        let u64_at = |off: usize| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&bytes[off..off + 8]);
            u64::from_le_bytes(raw)
        };
        let u32_at = |off: usize| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&bytes[off..off + 4]);
            u32::from_le_bytes(raw)
        };
        KernelArgs {
            a_addr: DeviceAddr::new(u64_at(0)),
            b_addr: DeviceAddr::new(u64_at(8)),
            c_addr: DeviceAddr::new(u64_at(16)),
            size: u32_at(24),
            num_tasks: u32_at(28),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout_is_stable() {
        let args = KernelArgs {
            a_addr: DeviceAddr::new(0x1122_3344_5566_7788),
            b_addr: DeviceAddr::new(0x0000_0000_2000_0000),
            c_addr: DeviceAddr::new(0x0000_0000_3000_0040),
            size: 16,
            num_tasks: 256,
        };
        let packed = args.pack();
        assert_eq!(
            packed,
            [
                0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11, // a_addr
                0x00, 0x00, 0x00, 0x20, 0x00, 0x00, 0x00, 0x00, // b_addr
                0x40, 0x00, 0x00, 0x30, 0x00, 0x00, 0x00, 0x00, // c_addr
                0x10, 0x00, 0x00, 0x00, // size
                0x00, 0x01, 0x00, 0x00, // num_tasks
            ]
        );
    }

    #[test]
    fn test_pack_unpack_roundtrip() {
        let args = KernelArgs {
            a_addr: DeviceAddr::new(0x1000_0000),
            b_addr: DeviceAddr::new(0x1000_0040),
            c_addr: DeviceAddr::new(0x1000_0080),
            size: 2,
            num_tasks: 4,
        };
        assert_eq!(KernelArgs::unpack(&args.pack()), args);
    }

    #[test]
    fn test_pack_field_offsets() {
        let args = KernelArgs {
            a_addr: DeviceAddr::new(1),
            b_addr: DeviceAddr::new(2),
            c_addr: DeviceAddr::new(3),
            size: 4,
            num_tasks: 16,
        };
        let packed = args.pack();
        assert_eq!(u64::from_le_bytes(packed[0..8].try_into().unwrap()), 1);
        assert_eq!(u64::from_le_bytes(packed[8..16].try_into().unwrap()), 2);
        assert_eq!(u64::from_le_bytes(packed[16..24].try_into().unwrap()), 3);
        assert_eq!(u32::from_le_bytes(packed[24..28].try_into().unwrap()), 4);
        assert_eq!(u32::from_le_bytes(packed[28..32].try_into().unwrap()), 16);
    }
}
