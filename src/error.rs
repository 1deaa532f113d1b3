use snafu::Snafu;

#[derive(Snafu, Debug, Clone, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum SchedulerError {
    #[snafu(display("invalid argument: {reason}"))]
    InvalidArgument { reason: String },
}

pub type Result<T, E = SchedulerError> = std::result::Result<T, E>;
