use std::collections::BTreeMap;
use std::net::IpAddr;
use std::time::{Duration, SystemTime};

use paste::paste;

use crate::api::collection::map_type_name;
use crate::api::{
    Binding, Callback, Collection, Counter, FlagSet, Mapping, Primitive, Scalar, Switch, TimeField,
};
use crate::convert::{BytesBase64, BytesHex, Complex, IpMask, IpNet, TimeLayout};
use crate::error::{ParseError, ValueError};
use crate::model::Opt;

fn must<T>(result: Result<T, ParseError>) -> T {
    match result {
        Ok(value) => value,
        Err(error) => panic!("{error}"),
    }
}

macro_rules! scalar_flags {
    ($($name:ident: $typ:ty => $field:ident),* $(,)?) => {
        paste! {
            impl FlagSet {
                $(
                    #[doc = "Register a `" $name "` flag, returning the binding that receives its value."]
                    pub fn $name(&mut self, name: &str, value: $typ, usage: &str, opts: &[Opt]) -> Binding<$typ> {
                        let variable = Binding::new(value);
                        self.var($field::new(variable.clone()), name, usage, opts);
                        variable
                    }

                    #[doc = "Register a `" $name "` flag storing into `variable`, which is first set to `value`."]
                    pub fn [<$name _var>](&mut self, variable: &Binding<$typ>, name: &str, value: $typ, usage: &str, opts: &[Opt]) {
                        variable.replace(value);
                        self.var($field::new(variable.clone()), name, usage, opts);
                    }

                    #[doc = "The value of the `" $name "` flag called `name`."]
                    pub fn [<get_ $name>](&self, name: &str) -> Result<$typ, ParseError> {
                        self.get_as::<$typ>(name, <$typ as Primitive>::TYPE_NAME)
                    }

                    #[doc = "Like [`FlagSet::get_" $name "`], but panics on error."]
                    pub fn [<must_get_ $name>](&self, name: &str) -> $typ {
                        must(self.[<get_ $name>](name))
                    }
                )*
            }
        }
    };
}

macro_rules! slice_flags {
    ($($name:ident: $typ:ty),* $(,)?) => {
        paste! {
            impl FlagSet {
                $(
                    #[doc = "Register a `" $name "` slice flag; each occurrence adds one element, the first discarding `value`."]
                    pub fn [<$name _slice>](&mut self, name: &str, value: Vec<$typ>, usage: &str, opts: &[Opt]) -> Binding<Vec<$typ>> {
                        let variable = Binding::new(value);
                        self.var(Collection::new(variable.clone()), name, usage, opts);
                        variable
                    }

                    #[doc = "Register a `" $name "` slice flag storing into `variable`, which is first set to `value`."]
                    pub fn [<$name _slice_var>](&mut self, variable: &Binding<Vec<$typ>>, name: &str, value: Vec<$typ>, usage: &str, opts: &[Opt]) {
                        variable.replace(value);
                        self.var(Collection::new(variable.clone()), name, usage, opts);
                    }

                    #[doc = "The elements of the `" $name "` slice flag called `name`."]
                    pub fn [<get_ $name _slice>](&self, name: &str) -> Result<Vec<$typ>, ParseError> {
                        self.get_as::<Vec<$typ>>(name, <$typ as Primitive>::SLICE_NAME)
                    }

                    #[doc = "Like [`FlagSet::get_" $name "_slice`], but panics on error."]
                    pub fn [<must_get_ $name _slice>](&self, name: &str) -> Vec<$typ> {
                        must(self.[<get_ $name _slice>](name))
                    }
                )*
            }
        }
    };
}

macro_rules! map_flags {
    ($($name:ident: $typ:ty),* $(,)?) => {
        paste! {
            impl FlagSet {
                $(
                    #[doc = "Register a `" $name "` flag of `key=value` entries; the first occurrence discards `value`."]
                    pub fn $name(&mut self, name: &str, value: BTreeMap<String, $typ>, usage: &str, opts: &[Opt]) -> Binding<BTreeMap<String, $typ>> {
                        let variable = Binding::new(value);
                        self.var(Mapping::new(variable.clone()), name, usage, opts);
                        variable
                    }

                    #[doc = "Register a `" $name "` flag of `key=value` entries, storing into `variable`."]
                    pub fn [<$name _var>](&mut self, variable: &Binding<BTreeMap<String, $typ>>, name: &str, value: BTreeMap<String, $typ>, usage: &str, opts: &[Opt]) {
                        variable.replace(value);
                        self.var(Mapping::new(variable.clone()), name, usage, opts);
                    }

                    #[doc = "The entries of the `" $name "` flag called `name`."]
                    pub fn [<get_ $name>](&self, name: &str) -> Result<BTreeMap<String, $typ>, ParseError> {
                        self.get_as::<BTreeMap<String, $typ>>(name, &map_type_name::<$typ>())
                    }

                    #[doc = "Like [`FlagSet::get_" $name "`], but panics on error."]
                    pub fn [<must_get_ $name>](&self, name: &str) -> BTreeMap<String, $typ> {
                        must(self.[<get_ $name>](name))
                    }
                )*
            }
        }
    };
}

scalar_flags! {
    bool: bool => Switch,
    int: isize => Scalar,
    int8: i8 => Scalar,
    int16: i16 => Scalar,
    int32: i32 => Scalar,
    int64: i64 => Scalar,
    uint: usize => Scalar,
    uint8: u8 => Scalar,
    uint16: u16 => Scalar,
    uint32: u32 => Scalar,
    uint64: u64 => Scalar,
    float32: f32 => Scalar,
    float64: f64 => Scalar,
    complex128: Complex => Scalar,
    duration: Duration => Scalar,
    ip: IpAddr => Scalar,
    ip_mask: IpMask => Scalar,
    ip_net: IpNet => Scalar,
    bytes_hex: BytesHex => Scalar,
    bytes_base64: BytesBase64 => Scalar,
}

slice_flags! {
    bool: bool,
    int: isize,
    int8: i8,
    int16: i16,
    int32: i32,
    int64: i64,
    uint: usize,
    uint8: u8,
    uint16: u16,
    uint32: u32,
    uint64: u64,
    float32: f32,
    float64: f64,
    complex128: Complex,
    duration: Duration,
    ip: IpAddr,
    ip_net: IpNet,
    string: String,
}

map_flags! {
    string_to_int: isize,
    string_to_int64: i64,
    string_to_string: String,
}

impl FlagSet {
    /// Register a `String` flag, returning the binding that receives its value.
    pub fn string(
        &mut self,
        name: &str,
        value: impl Into<String>,
        usage: &str,
        opts: &[Opt],
    ) -> Binding<String> {
        let variable = Binding::new(value.into());
        self.var(Scalar::new(variable.clone()), name, usage, opts);
        variable
    }

    /// Register a `String` flag storing into `variable`, which is first set to `value`.
    pub fn string_var(
        &mut self,
        variable: &Binding<String>,
        name: &str,
        value: impl Into<String>,
        usage: &str,
        opts: &[Opt],
    ) {
        variable.replace(value.into());
        self.var(Scalar::new(variable.clone()), name, usage, opts);
    }

    /// The value of the `String` flag called `name`.
    pub fn get_string(&self, name: &str) -> Result<String, ParseError> {
        self.get_as::<String>(name, String::TYPE_NAME)
    }

    /// Like [`FlagSet::get_string`], but panics on error.
    pub fn must_get_string(&self, name: &str) -> String {
        must(self.get_string(name))
    }

    /// Register a counter flag starting at `0`: every bare occurrence adds one (ex: `-vvv`).
    ///
    /// ### Example
    /// ```
    /// # use flagset_core as flagset;
    /// use flagset::{ErrorHandling, FlagSet, Opt};
    ///
    /// let mut flags = FlagSet::new("program", ErrorHandling::ContinueOnError);
    /// let verbosity = flags.count("verbose", "verbosity", &[Opt::Shorthand('v')]);
    /// flags.parse(&["-vvv", "--verbose"]).unwrap();
    /// assert_eq!(verbosity.get(), 4);
    /// ```
    pub fn count(&mut self, name: &str, usage: &str, opts: &[Opt]) -> Binding<isize> {
        let variable = Binding::default();
        self.count_var(&variable, name, usage, opts);
        variable
    }

    /// Register a counter flag storing into `variable`, which is first reset to `0`.
    pub fn count_var(&mut self, variable: &Binding<isize>, name: &str, usage: &str, opts: &[Opt]) {
        variable.replace(0);
        self.var(Counter::new(variable.clone()), name, usage, opts);
    }

    /// The value of the counter flag called `name`.
    pub fn get_count(&self, name: &str) -> Result<isize, ParseError> {
        self.get_as::<isize>(name, "count")
    }

    /// Like [`FlagSet::get_count`], but panics on error.
    pub fn must_get_count(&self, name: &str) -> isize {
        must(self.get_count(name))
    }

    /// Register a flag that calls `callback` with the raw value of every occurrence.
    pub fn func<F>(&mut self, name: &str, usage: &str, callback: F, opts: &[Opt])
    where
        F: FnMut(&str) -> Result<(), ValueError> + 'static,
    {
        self.var(Callback::new(callback), name, usage, opts);
    }

    /// Register a timestamp flag, accepting the first of `layouts` that matches.
    ///
    /// ### Example
    /// ```
    /// # use flagset_core as flagset;
    /// use flagset::{ErrorHandling, FlagSet, TimeLayout};
    /// use std::time::{Duration, UNIX_EPOCH};
    ///
    /// let mut flags = FlagSet::new("program", ErrorHandling::ContinueOnError);
    /// let since = flags.time(
    ///     "since",
    ///     UNIX_EPOCH,
    ///     &[TimeLayout::Rfc3339, TimeLayout::DateOnly],
    ///     "start of the window",
    ///     &[],
    /// );
    /// flags.parse(&["--since", "1970-01-02"]).unwrap();
    /// assert_eq!(since.get(), UNIX_EPOCH + Duration::from_secs(86_400));
    /// ```
    pub fn time(
        &mut self,
        name: &str,
        value: SystemTime,
        layouts: &[TimeLayout],
        usage: &str,
        opts: &[Opt],
    ) -> Binding<SystemTime> {
        let variable = Binding::new(value);
        self.time_var(&variable, name, value, layouts, usage, opts);
        variable
    }

    /// Register a timestamp flag storing into `variable`, which is first set to `value`.
    pub fn time_var(
        &mut self,
        variable: &Binding<SystemTime>,
        name: &str,
        value: SystemTime,
        layouts: &[TimeLayout],
        usage: &str,
        opts: &[Opt],
    ) {
        variable.replace(value);
        self.var(
            TimeField::new(variable.clone(), layouts.to_vec()),
            name,
            usage,
            opts,
        );
    }

    /// The value of the timestamp flag called `name`.
    pub fn get_time(&self, name: &str) -> Result<SystemTime, ParseError> {
        self.get_as::<SystemTime>(name, "time")
    }

    /// Like [`FlagSet::get_time`], but panics on error.
    pub fn must_get_time(&self, name: &str) -> SystemTime {
        must(self.get_time(name))
    }
}
