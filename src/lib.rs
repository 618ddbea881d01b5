pub mod demo;
pub mod modeling;
pub mod sim;
pub mod trace;

#[cfg(test)]
mod test;
