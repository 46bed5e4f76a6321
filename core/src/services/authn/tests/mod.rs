
mod algorithm_tests;
mod service_tests;
