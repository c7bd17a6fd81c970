pub mod simulated_resolver;
