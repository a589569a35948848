// lh2-core/src/units.rs

use uom::si::f64::{
    Power as UomPower, ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type Power = UomPower;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn days(v: f64) -> Time {
    use uom::si::time::day;
    Time::new::<day>(v)
}

#[inline]
pub fn w(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

pub mod constants {
    /// Standard atmosphere [Pa].
    pub const ATM_PA: f64 = 101_325.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_is_86400_seconds() {
        use uom::si::time::second;
        assert_eq!(days(1.0).get::<second>(), 86_400.0);
        assert_eq!(s(86_400.0), days(1.0));
    }

    #[test]
    fn heat_load_and_temperature_round_trip() {
        use uom::si::power::watt;
        use uom::si::thermodynamic_temperature::kelvin;
        assert_eq!(w(40.7).get::<watt>(), 40.7);
        assert_eq!(k(20.3).get::<kelvin>(), 20.3);
    }
}
