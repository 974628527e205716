//! External delivery channels for marketplace notifications.
//!
//! The dispatcher pushes each event through KakaoTalk alimtalk and, when
//! the recipient has an address, email.

pub mod alimtalk;
pub mod email;
