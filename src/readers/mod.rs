pub mod daily_reader;

pub use daily_reader::DailyReader;
