//! Inbound adapters translating external requests into domain service
//! calls. Framework details stay at this edge.

pub mod http;
