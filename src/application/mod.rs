//! Application layer: the domain-facing repository contract and the
//! use-case facade built on top of it. Depends on `domain` and the
//! repository/peer traits from `infrastructure`, never on concrete SQL.

pub mod repository;
pub mod wallet_facade;

pub use repository::WalletRepository;
pub use wallet_facade::{CategoryValidator, UseCaseResult, WalletFacade};
