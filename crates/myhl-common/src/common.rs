// common.rs -- network message read/write layer over SizeBuf

use thiserror::Error;

use crate::q_shared::Vec3;
use crate::qcommon::SizeBuf;

/// Recoverable decode failure for a single server message. The engine
/// originals fabricated -1 for reads past the declared size; here every
/// read is bounds-checked and the message is abandoned instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgError {
    /// A typed read would cross the declared message size.
    #[error("message overrun: {want} byte read at offset {at}, size {size}")]
    Overrun { at: usize, want: usize, size: usize },
}

// ============================================================
// MSG read functions
// ============================================================

pub fn msg_begin_reading(msg: &mut SizeBuf) {
    msg.readcount = 0;
}

/// Claim `want` bytes from the front of the remaining message, returning
/// the start offset. On overrun the cursor is pinned at the end so later
/// reads fail the same way.
fn msg_read_span(msg: &mut SizeBuf, want: usize) -> Result<usize, MsgError> {
    let at = msg.readcount as usize;
    let size = msg.cursize as usize;
    if at + want > size {
        msg.readcount = msg.cursize;
        return Err(MsgError::Overrun { at, want, size });
    }
    msg.readcount += want as i32;
    Ok(at)
}

pub fn msg_read_char(msg: &mut SizeBuf) -> Result<i32, MsgError> {
    let at = msg_read_span(msg, 1)?;
    Ok(msg.data[at] as i8 as i32)
}

pub fn msg_read_byte(msg: &mut SizeBuf) -> Result<i32, MsgError> {
    let at = msg_read_span(msg, 1)?;
    Ok(msg.data[at] as i32)
}

pub fn msg_read_short(msg: &mut SizeBuf) -> Result<i32, MsgError> {
    let at = msg_read_span(msg, 2)?;
    Ok(i16::from_le_bytes([msg.data[at], msg.data[at + 1]]) as i32)
}

pub fn msg_read_long(msg: &mut SizeBuf) -> Result<i32, MsgError> {
    let at = msg_read_span(msg, 4)?;
    Ok(i32::from_le_bytes([
        msg.data[at],
        msg.data[at + 1],
        msg.data[at + 2],
        msg.data[at + 3],
    ]))
}

pub fn msg_read_float(msg: &mut SizeBuf) -> Result<f32, MsgError> {
    let at = msg_read_span(msg, 4)?;
    Ok(f32::from_le_bytes([
        msg.data[at],
        msg.data[at + 1],
        msg.data[at + 2],
        msg.data[at + 3],
    ]))
}

/// Bytes up to a NUL terminator or the end of the message, whichever comes
/// first. Running off the end is not an error for strings.
pub fn msg_read_string(msg: &mut SizeBuf) -> String {
    let mut result = String::new();
    while msg.readcount < msg.cursize {
        let c = msg.data[msg.readcount as usize];
        msg.readcount += 1;
        if c == 0 {
            break;
        }
        result.push(c as char);
        if result.len() >= 2047 {
            break;
        }
    }
    result
}

/// World coordinate, sent as a short in 1/8 unit precision.
pub fn msg_read_coord(msg: &mut SizeBuf) -> Result<f32, MsgError> {
    Ok(msg_read_short(msg)? as f32 * (1.0 / 8.0))
}

pub fn msg_read_pos(msg: &mut SizeBuf) -> Result<Vec3, MsgError> {
    Ok([
        msg_read_coord(msg)?,
        msg_read_coord(msg)?,
        msg_read_coord(msg)?,
    ])
}

// ============================================================
// MSG write functions
// ============================================================

pub fn msg_write_char(sb: &mut SizeBuf, c: i32) {
    if let Some(start) = sb.get_space(1) {
        sb.data[start] = c as u8;
    }
}

pub fn msg_write_byte(sb: &mut SizeBuf, c: i32) {
    if let Some(start) = sb.get_space(1) {
        sb.data[start] = c as u8;
    }
}

pub fn msg_write_short(sb: &mut SizeBuf, c: i32) {
    if let Some(start) = sb.get_space(2) {
        sb.data[start..start + 2].copy_from_slice(&(c as i16).to_le_bytes());
    }
}

pub fn msg_write_long(sb: &mut SizeBuf, c: i32) {
    if let Some(start) = sb.get_space(4) {
        sb.data[start..start + 4].copy_from_slice(&c.to_le_bytes());
    }
}

pub fn msg_write_float(sb: &mut SizeBuf, f: f32) {
    if let Some(start) = sb.get_space(4) {
        sb.data[start..start + 4].copy_from_slice(&f.to_le_bytes());
    }
}

pub fn msg_write_string(sb: &mut SizeBuf, s: &str) {
    sb.write(s.as_bytes());
    sb.write(&[0]); // null terminator
}

pub fn msg_write_coord(sb: &mut SizeBuf, f: f32) {
    msg_write_short(sb, (f * 8.0) as i32);
}

pub fn msg_write_pos(sb: &mut SizeBuf, pos: &Vec3) {
    msg_write_coord(sb, pos[0]);
    msg_write_coord(sb, pos[1]);
    msg_write_coord(sb, pos[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Typed reads ==========

    #[test]
    fn read_byte_advances_cursor() {
        let mut msg = SizeBuf::from_message(&[7, 200]);
        assert_eq!(msg_read_byte(&mut msg), Ok(7));
        assert_eq!(msg.readcount, 1);
        assert_eq!(msg_read_byte(&mut msg), Ok(200));
        assert_eq!(msg.readcount, 2);
    }

    #[test]
    fn read_char_sign_extends() {
        let mut msg = SizeBuf::from_message(&[0xff]);
        assert_eq!(msg_read_char(&mut msg), Ok(-1));
    }

    #[test]
    fn read_short_little_endian() {
        let mut msg = SizeBuf::from_message(&[0x34, 0x12]);
        assert_eq!(msg_read_short(&mut msg), Ok(0x1234));
    }

    #[test]
    fn read_short_negative() {
        let mut msg = SizeBuf::from_message(&(-8i16).to_le_bytes());
        assert_eq!(msg_read_short(&mut msg), Ok(-8));
    }

    #[test]
    fn long_roundtrips_through_writer() {
        let mut sb = SizeBuf::new(8);
        msg_write_long(&mut sb, 0x0102_0304);
        let mut msg = SizeBuf::from_message(&sb.data[..sb.cursize as usize]);
        assert_eq!(msg_read_long(&mut msg), Ok(0x0102_0304));
        assert_eq!(msg.readcount, 4);
    }

    #[test]
    fn float_roundtrips_through_writer() {
        let mut sb = SizeBuf::new(8);
        msg_write_float(&mut sb, 1.5);
        let mut msg = SizeBuf::from_message(&sb.data[..sb.cursize as usize]);
        assert_eq!(msg_read_float(&mut msg), Ok(1.5));
    }

    #[test]
    fn char_roundtrips_sign() {
        let mut sb = SizeBuf::new(4);
        msg_write_char(&mut sb, -100);
        let mut msg = SizeBuf::from_message(&sb.data[..sb.cursize as usize]);
        assert_eq!(msg_read_char(&mut msg), Ok(-100));
    }

    // ========== Coordinate encoding ==========

    #[test]
    fn coord_is_eighth_unit_fixed_point() {
        let mut msg = SizeBuf::from_message(&12i16.to_le_bytes());
        assert_eq!(msg_read_coord(&mut msg), Ok(1.5));
    }

    #[test]
    fn coord_roundtrips_through_writer() {
        let mut sb = SizeBuf::new(8);
        msg_write_coord(&mut sb, -17.25);
        let mut msg = SizeBuf::from_message(&sb.data[..sb.cursize as usize]);
        assert_eq!(msg_read_coord(&mut msg), Ok(-17.25));
    }

    #[test]
    fn pos_reads_three_coords() {
        let mut sb = SizeBuf::new(8);
        msg_write_pos(&mut sb, &[1.0, 2.0, 3.0]);
        assert_eq!(sb.cursize, 6);
        let mut msg = SizeBuf::from_message(&sb.data[..sb.cursize as usize]);
        assert_eq!(msg_read_pos(&mut msg), Ok([1.0, 2.0, 3.0]));
        assert_eq!(msg.readcount, 6);
    }

    // ========== Strings ==========

    #[test]
    fn string_stops_at_null() {
        let mut msg = SizeBuf::from_message(b"bolt.mdl\0\x07");
        assert_eq!(msg_read_string(&mut msg), "bolt.mdl");
        // terminator consumed, trailing byte still readable
        assert_eq!(msg_read_byte(&mut msg), Ok(7));
    }

    #[test]
    fn string_stops_at_buffer_end_without_error() {
        let mut msg = SizeBuf::from_message(b"abc");
        assert_eq!(msg_read_string(&mut msg), "abc");
        assert_eq!(msg.readcount, 3);
    }

    #[test]
    fn string_at_end_is_empty() {
        let mut msg = SizeBuf::from_message(&[]);
        assert_eq!(msg_read_string(&mut msg), "");
    }

    #[test]
    fn write_string_appends_terminator() {
        let mut sb = SizeBuf::new(16);
        msg_write_string(&mut sb, "ab");
        assert_eq!(&sb.data[..3], &[b'a', b'b', 0]);
    }

    // ========== Bounds checking ==========

    #[test]
    fn read_past_end_is_overrun() {
        let mut msg = SizeBuf::from_message(&[]);
        assert_eq!(
            msg_read_byte(&mut msg),
            Err(MsgError::Overrun { at: 0, want: 1, size: 0 })
        );
    }

    #[test]
    fn short_truncated_mid_field_is_overrun() {
        let mut msg = SizeBuf::from_message(&[0x11]);
        assert_eq!(
            msg_read_short(&mut msg),
            Err(MsgError::Overrun { at: 0, want: 2, size: 1 })
        );
        // cursor pinned at the end; the next read fails too
        assert_eq!(msg.readcount, msg.cursize);
        assert!(msg_read_byte(&mut msg).is_err());
    }

    #[test]
    fn overrun_reports_offset_of_failed_read() {
        let mut msg = SizeBuf::from_message(&[1, 2, 3]);
        assert_eq!(msg_read_short(&mut msg), Ok(0x0201));
        assert_eq!(
            msg_read_short(&mut msg),
            Err(MsgError::Overrun { at: 2, want: 2, size: 3 })
        );
    }

    #[test]
    fn begin_reading_resets_cursor() {
        let mut msg = SizeBuf::from_message(&[9, 9]);
        msg_read_byte(&mut msg).unwrap();
        msg_begin_reading(&mut msg);
        assert_eq!(msg.readcount, 0);
    }
}
