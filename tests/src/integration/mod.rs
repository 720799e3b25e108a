//! # Integration Scenarios

#[cfg(test)]
mod fixtures;

#[cfg(test)]
mod batch;
#[cfg(test)]
mod fees;
#[cfg(test)]
mod marshaler;
#[cfg(test)]
mod migration;
#[cfg(test)]
mod scheduling;
#[cfg(test)]
mod timed_state_lifecycle;
#[cfg(test)]
mod validation;
