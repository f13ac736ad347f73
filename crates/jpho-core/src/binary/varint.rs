//! Unsigned LEB128 limited to `u32`.

use crate::dict::DictError;

const MAX_VARINT_LEN: usize = 5;

pub(crate) fn write_varint(buf: &mut Vec<u8>, mut value: u32) {
    while value >= 0x80 {
        buf.push((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

/// Read a varint at `pos`, returning the value and the position after it.
pub(crate) fn read_varint(data: &[u8], pos: usize) -> Result<(u32, usize), DictError> {
    let mut value: u64 = 0;
    for i in 0..MAX_VARINT_LEN {
        let byte = *data
            .get(pos + i)
            .ok_or(DictError::Truncated { offset: pos + i })?;
        value |= u64::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            let value = u32::try_from(value).map_err(|_| DictError::InvalidVarint { offset: pos })?;
            return Ok((value, pos + i + 1));
        }
    }
    Err(DictError::InvalidVarint { offset: pos })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_byte() {
        let mut buf = Vec::new();
        write_varint(&mut buf, 0x7F);
        assert_eq!(buf, vec![0x7F]);
        assert_eq!(read_varint(&buf, 0).unwrap(), (0x7F, 1));
    }

    #[test]
    fn test_multi_byte() {
        let mut buf = Vec::new();
        write_varint(&mut buf, 300);
        assert_eq!(buf, vec![0xAC, 0x02]);
        assert_eq!(read_varint(&buf, 0).unwrap(), (300, 2));
    }

    #[test]
    fn test_max_value() {
        let mut buf = Vec::new();
        write_varint(&mut buf, u32::MAX);
        assert_eq!(buf.len(), 5);
        assert_eq!(read_varint(&buf, 0).unwrap(), (u32::MAX, 5));
    }

    #[test]
    fn test_truncated() {
        assert!(matches!(
            read_varint(&[0x80, 0x80], 0),
            Err(DictError::Truncated { offset: 2 })
        ));
    }

    #[test]
    fn test_overlong() {
        let data = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
        assert!(matches!(
            read_varint(&data, 0),
            Err(DictError::InvalidVarint { offset: 0 })
        ));
    }

    #[test]
    fn test_overflow_in_fifth_byte() {
        // 5th byte 0x7F would set bits beyond u32.
        let data = [0xFF, 0xFF, 0xFF, 0xFF, 0x7F];
        assert!(matches!(
            read_varint(&data, 0),
            Err(DictError::InvalidVarint { offset: 0 })
        ));
    }
}
