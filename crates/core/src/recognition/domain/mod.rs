pub mod identity_resolver;
