#![warn(missing_docs)]
//! Module for additional uom macros that facilitate the creation of single unit values or vecs of them
/// helper macro to create the units
#[macro_export]
macro_rules! uom_unit_creator {

    ($unit:ident, $unit_type:ident, $val1:expr) => {
        $unit_type::new::<$unit>($val1)
    };
    ($unit:ident, $unit_type:ident, $( $x:expr ),*) => {
        {
            use std::vec::Vec;
            let mut temp_vec = Vec::new();
            $(
                temp_vec.push($unit_type::new::<$unit>($x));
            )*
            temp_vec
        }
    };
}
///macro to create a Length in meter
#[macro_export]
macro_rules! meter {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Length, length::meter};
        $crate::uom_unit_creator![meter, Length, $( $x ),*]
    }};
}
///macro to create a Length in millimeter
#[macro_export]
macro_rules! millimeter {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Length, length::millimeter};
        $crate::uom_unit_creator![millimeter, Length, $( $x ),*]
    }};
}
///macro to create a Length in micrometer
#[macro_export]
macro_rules! micrometer {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Length, length::micrometer};
        $crate::uom_unit_creator![micrometer, Length, $( $x ),*]
    }};
}
///macro to create a Length in nanometer
#[macro_export]
macro_rules! nanometer {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Length, length::nanometer};
        $crate::uom_unit_creator![nanometer, Length, $( $x ),*]
    }};
}
///macro to create an angle in radian
#[macro_export]
macro_rules! radian {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Angle, angle::radian};
        $crate::uom_unit_creator![radian, Angle, $( $x ),*]
    }};
}
///macro to create an angle in degree
#[macro_export]
macro_rules! degree {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Angle, angle::degree};
        $crate::uom_unit_creator![degree, Angle, $( $x ),*]
    }};
}
///macro to create a frequency in hertz
#[macro_export]
macro_rules! hertz {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Frequency, frequency::hertz};
        $crate::uom_unit_creator![hertz, Frequency, $( $x ),*]
    }};
}
///macro to create a frequency in megahertz
#[macro_export]
macro_rules! megahertz {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Frequency, frequency::megahertz};
        $crate::uom_unit_creator![megahertz, Frequency, $( $x ),*]
    }};
}
///macro to create a velocity in meter per second
#[macro_export]
macro_rules! meter_per_second {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Velocity, velocity::meter_per_second};
        $crate::uom_unit_creator![meter_per_second, Velocity, $( $x ),*]
    }};
}
///macro to create a power in watt
#[macro_export]
macro_rules! watt {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Power, power::watt};
        $crate::uom_unit_creator![watt, Power, $( $x ),*]
    }};
}
///macro to create a power in milliwatt
#[macro_export]
macro_rules! milliwatt {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::Power, power::milliwatt};
        $crate::uom_unit_creator![milliwatt, Power, $( $x ),*]
    }};
}
///macro to create a linear number density in 1/mm (e.g. grating line densities)
#[macro_export]
macro_rules! num_per_mm {
    ($( $x:expr ),*) =>{{
        use uom::si::{f64::LinearNumberDensity, linear_number_density::per_millimeter};
        $crate::uom_unit_creator![per_millimeter, LinearNumberDensity, $( $x ),*]
    }};
}
