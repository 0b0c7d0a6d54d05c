#[cfg(test)]
mod audit;
