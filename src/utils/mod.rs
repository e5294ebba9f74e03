pub(crate) mod date;
pub(crate) mod timezone;

pub(crate) use date::{parse_date, parse_set};
pub(crate) use timezone::Timezone;
