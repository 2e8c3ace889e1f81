//! API client for the external card pricing service (Scryfall)

pub mod scryfall;

pub use scryfall::{ScryfallCard, ScryfallClient, ScryfallList, ScryfallPrices, SetPages};
