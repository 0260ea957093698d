pub mod biometric_credential;
pub mod nakliye_kayit;
pub mod user;
pub mod verification_code;
pub mod yatan_tutar;
