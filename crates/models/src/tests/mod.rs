
/// Item entity persistence tests
pub mod item_tests;
