mod clock;
mod probe;
mod sim_time;
mod trace;
