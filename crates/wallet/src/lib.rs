pub mod message;
pub mod verify;

pub use message::{
    CLOCK_SKEW_MS, LINK_FRESHNESS, MINT_FRESHNESS, check_freshness, extract_timestamp,
    link_message, parse_link_message,
};
pub use verify::{is_plausible_payment_signature, verify_signature};
