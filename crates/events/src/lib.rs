//! CNEC event bus and notification delivery.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`MarketplaceEvent`]: a business event addressed to one recipient.
//! - [`delivery`]: external channels (KakaoTalk alimtalk, email).
//! - [`NotificationDispatcher`]: consumes bus events and delivers them.

pub mod bus;
pub mod delivery;
pub mod dispatch;

pub use bus::{EventBus, MarketplaceEvent};
pub use delivery::alimtalk::{
    AlimtalkConfig, AlimtalkError, AlimtalkGateway, AlimtalkMessage, AlimtalkReceipt,
    KakaoAlimtalk,
};
pub use delivery::email::{EmailConfig, EmailDelivery, EmailError, EmailSender};
pub use dispatch::{ChannelResult, DispatchReport, NotificationDispatcher};
