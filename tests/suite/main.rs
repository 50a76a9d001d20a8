mod integration_tests;
mod parser_tests;
mod property_tests;
mod shape_tests;
