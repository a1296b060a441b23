pub mod token_resource;
