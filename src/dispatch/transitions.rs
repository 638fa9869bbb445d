use crate::models::ride::RideStatus;

const TRANSITIONS: &[(RideStatus, RideStatus)] = &[
    (RideStatus::Requested, RideStatus::Accepted),
    (RideStatus::Accepted, RideStatus::DriverArriving),
    (RideStatus::DriverArriving, RideStatus::InProgress),
    (RideStatus::InProgress, RideStatus::Completed),
    (RideStatus::Requested, RideStatus::Cancelled),
    (RideStatus::Accepted, RideStatus::Cancelled),
    (RideStatus::DriverArriving, RideStatus::Cancelled),
    (RideStatus::InProgress, RideStatus::Cancelled),
];

pub fn is_legal(from: RideStatus, to: RideStatus) -> bool {
    TRANSITIONS.iter().any(|&(f, t)| f == from && t == to)
}
