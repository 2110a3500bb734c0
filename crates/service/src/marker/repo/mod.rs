pub mod seaorm;
pub mod json_file;

pub use json_file::JsonFileMarkerRepository;
pub use seaorm::SeaOrmMarkerRepository;
