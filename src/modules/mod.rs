pub mod quick_marc;
