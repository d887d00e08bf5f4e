// qcommon.rs -- definitions common to client and server

use tracing::warn;

// ============================================================
// SizeBuf -- sized byte buffer for network messages
// ============================================================

#[derive(Debug, Clone, Default)]
pub struct SizeBuf {
    pub allow_overflow: bool,
    pub overflowed: bool,
    pub data: Vec<u8>,
    pub maxsize: i32,
    pub cursize: i32,
    pub readcount: i32,
}

impl SizeBuf {
    pub fn new(maxsize: i32) -> Self {
        Self {
            allow_overflow: false,
            overflowed: false,
            data: vec![0u8; maxsize as usize],
            maxsize,
            cursize: 0,
            readcount: 0,
        }
    }

    /// Wrap one received server message for reading. The declared size is
    /// the slice length; the read cursor starts at the front. The host owns
    /// the original bytes only for the duration of the delivering callback,
    /// so the message is copied here.
    pub fn from_message(data: &[u8]) -> Self {
        Self {
            allow_overflow: false,
            overflowed: false,
            data: data.to_vec(),
            maxsize: data.len() as i32,
            cursize: data.len() as i32,
            readcount: 0,
        }
    }

    pub fn clear(&mut self) {
        self.cursize = 0;
        self.overflowed = false;
    }

    pub fn get_space(&mut self, length: usize) -> Option<usize> {
        let cursize = self.cursize as usize;
        let maxsize = self.maxsize as usize;

        if cursize + length > maxsize {
            if !self.allow_overflow {
                // overflowing a fixed-size message is a programmer error
                panic!("SizeBuf::get_space: overflow without allow_overflow set");
            }
            if length > maxsize {
                panic!("SizeBuf::get_space: {} is > full buffer size", length);
            }
            warn!("SizeBuf::get_space: overflow");
            self.clear();
            self.overflowed = true;
        }

        let start = self.cursize as usize;
        self.cursize += length as i32;
        Some(start)
    }

    /// Write raw bytes into the buffer.
    pub fn write(&mut self, src: &[u8]) {
        if let Some(start) = self.get_space(src.len()) {
            self.data[start..start + src.len()].copy_from_slice(src);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_message_scopes_cursor_to_payload() {
        let msg = SizeBuf::from_message(&[1, 2, 3]);
        assert_eq!(msg.cursize, 3);
        assert_eq!(msg.maxsize, 3);
        assert_eq!(msg.readcount, 0);
        assert_eq!(msg.data, vec![1, 2, 3]);
    }

    #[test]
    fn from_message_empty() {
        let msg = SizeBuf::from_message(&[]);
        assert_eq!(msg.cursize, 0);
        assert_eq!(msg.readcount, 0);
    }

    #[test]
    fn write_advances_cursize() {
        let mut sb = SizeBuf::new(8);
        sb.write(&[0xaa, 0xbb]);
        assert_eq!(sb.cursize, 2);
        assert_eq!(&sb.data[0..2], &[0xaa, 0xbb]);
        assert!(!sb.overflowed);
    }

    #[test]
    fn overflow_with_allow_overflow_clears_buffer() {
        let mut sb = SizeBuf::new(4);
        sb.allow_overflow = true;
        sb.write(&[1, 2, 3]);
        sb.write(&[4, 5]); // crosses maxsize
        assert!(sb.overflowed);
        assert_eq!(sb.cursize, 2);
    }

    #[test]
    #[should_panic(expected = "overflow without allow_overflow")]
    fn overflow_without_allow_overflow_panics() {
        let mut sb = SizeBuf::new(2);
        sb.write(&[1, 2, 3]);
    }
}
