pub mod boards {
    /// The standard opening position.
    pub const CLASSIC: &str =
        "l++3d++kd++b+++2/2b7/3B+6/b++1B1ss+1b+++1B+/b+++1B+1S+S1b++1B/6b+++3/7B++2/2B+DKD3L";
}
