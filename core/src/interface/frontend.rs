/// Receive-only radio front-end that the sweep planner reads from.
///
/// Implementations tune, measure and return the received signal strength in
/// dBm. Nothing in this crate ever asks a front-end to transmit.
pub trait RadioFrontEnd {
    fn measure_rssi(&mut self, frequency: u32) -> i8;
}

impl<F> RadioFrontEnd for F
where
    F: FnMut(u32) -> i8,
{
    fn measure_rssi(&mut self, frequency: u32) -> i8 {
        self(frequency)
    }
}
