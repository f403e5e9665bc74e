//! Runtime helpers shared by the server binary and the HTTP crate:
//! logging bootstrap, request metrics, and the in-process rate limiter.

pub mod types;
pub mod utils;
pub mod observability;
pub mod perf;
pub mod rate_limit;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }
}
