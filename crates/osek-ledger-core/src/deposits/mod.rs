pub mod caps;
pub mod deductible;
pub mod recommend;
pub mod ytd;
