pub mod fit_scoring;
pub mod keywords;
