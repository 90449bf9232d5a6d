pub mod comprehensive;
pub mod income_tax;
pub mod national_insurance;
