pub mod faucet_dto;
