pub mod blog;
pub mod booking;
pub mod contact;
pub mod service;
pub mod user;

pub use blog::{BlogPost, PostStatus};
pub use booking::{Booking, BookingStatus, BookingType, PaymentStatus};
pub use contact::{ContactMessage, MessageStatus};
pub use service::Service;
pub use user::{Role, User};
