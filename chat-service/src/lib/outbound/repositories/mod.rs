pub mod conversation;
pub mod message;
pub mod user;

pub use conversation::PostgresConversationRepository;
pub use message::PostgresMessageRepository;
pub use user::PostgresUserRepository;
