mod card;
mod user;

pub use self::card::{
    CreateCardRecord, CreateCardRequest, DepositBalanceRequest, TransferBalanceRequest,
    TransferCardBalance, UpdateCardBalance, UpdateCardStatusRequest, WithdrawBalanceRequest,
};
pub use self::user::CreateUserRequest;
