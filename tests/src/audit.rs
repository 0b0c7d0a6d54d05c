mod fixtures;
mod integration;
