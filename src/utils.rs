use std::time::{Duration, Instant};

pub(crate) fn trace(is_test: bool, l_type: &str, l_step: &str, begin: Instant, _elapsed: Duration) -> Duration {
    if is_test {
        println!("{} | Total={}ms | {}={:.2?}", l_type, begin.elapsed().as_millis(), l_step, begin.elapsed() - _elapsed);
    }
    else {
        log::trace!("{} | Total={:.2?} | {}={:.2?}", l_type, begin.elapsed(), l_step, begin.elapsed() - _elapsed);
    }
    begin.elapsed()
}
