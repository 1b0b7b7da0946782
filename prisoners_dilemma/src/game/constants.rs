/// Number of rounds played before a match ends.
pub const MATCH_ROUNDS: u32 = 5;

/// Seats per room.
pub const MAX_PARTICIPANTS: usize = 2;

/// Length of a generated room code.
pub const ROOM_CODE_LEN: usize = 6;

/// Characters a room code is drawn from (base 36, upper case).
pub const ROOM_CODE_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
