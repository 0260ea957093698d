pub mod backup;
pub mod nakliye;
pub mod reports;
pub mod yatan_tutar;
