//! Core type definitions using newtype patterns for type safety.
//!
//! A `Port` can only be obtained through validation, so holding one is proof
//! that the number lies in the requested tier range.

mod address;
mod port;

pub use address::{
    parse_address, parse_address_for_tier, parse_address_for_tier_range, split_address_port,
    AddressError, ParsedAddress,
};
pub use port::{
    is_set, is_valid, is_valid_for_tier, is_valid_for_tier_range, Port, PortError, PortInput,
    PortTier, PortTierRange, INVALID, MAX_DYNAMIC, MAX_REGISTERED, MAX_SYSTEM, MIN_DYNAMIC,
    MIN_REGISTERED, MIN_SYSTEM,
};
