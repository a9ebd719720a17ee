#[cfg(test)]
pub mod common;



#[cfg(test)]
mod test_cache;



#[cfg(test)]
mod test_evolution;
