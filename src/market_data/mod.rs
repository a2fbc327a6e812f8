// Market data module entrypoint
pub mod adapters;       // venue-specific fetchers (Coinbase, Gemini)
pub mod cache;          // rate-limited single-slot cache in front of each venue
pub mod normaliser;     // converts strings -> validated price levels
pub mod unified_book;   // merges per-venue sides into one sorted book
pub mod router;         // fans out to venues and prices both sides
