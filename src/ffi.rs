//! C ABI exported functions
//!
//! These are the entry points a managed runtime binds against. They all
//! operate on [`Engine::global`]. Text crosses the boundary as UTF-8,
//! NUL-terminated strings; integer results are status codes from
//! [`LoggerError::status_code`] with `0` meaning success.

use crate::appenders::{LogEvent, LogEventHandler};
use crate::core::{status_of, Engine, EngineToken, LoggerError, Result};
use std::borrow::Cow;
use std::ffi::{c_char, c_int, c_void, CStr, CString};
use std::sync::Arc;

/// Foreign handler invoked for every record reaching a callback appender.
///
/// All string pointers are valid only for the duration of the call.
/// `file` and `function` are empty strings when no location was captured.
pub type LogEventCallback = unsafe extern "C" fn(
    cookie: *mut c_void,
    message: *const c_char,
    logger_name: *const c_char,
    level: c_int,
    thread_id: *const c_char,
    thread_name: *const c_char,
    timestamp_secs: u64,
    timestamp_micros: u32,
    file: *const c_char,
    function: *const c_char,
    line: c_int,
);

/// Caller-owned context pointer, echoed back unmodified
#[derive(Clone, Copy)]
struct Cookie(*mut c_void);

// SAFETY: the engine never dereferences the cookie; the caller guarantees it
// stays valid for, and may be used from, every thread that logs.
unsafe impl Send for Cookie {}
unsafe impl Sync for Cookie {}

impl Cookie {
    fn get(self) -> *mut c_void {
        self.0
    }
}

/// NUL bytes cannot cross as C strings, so they are dropped
fn to_cstring(text: &str) -> CString {
    CString::new(text).unwrap_or_else(|_| {
        let stripped: Vec<u8> = text.bytes().filter(|&b| b != 0).collect();
        CString::new(stripped).unwrap_or_default()
    })
}

/// Read an optional C string; invalid UTF-8 is replaced lossily.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
unsafe fn read_str<'a>(ptr: *const c_char) -> Option<Cow<'a, str>> {
    if ptr.is_null() {
        None
    } else {
        // SAFETY: non-null and NUL-terminated per the caller contract
        Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy())
    }
}

fn required<'a>(value: Option<Cow<'a, str>>, argument: &str) -> Result<Cow<'a, str>> {
    value.ok_or_else(|| LoggerError::invalid_argument(argument, "must not be null"))
}

/// Adapt a foreign callback and cookie into a handler closure
pub fn foreign_handler(callback: LogEventCallback, cookie: *mut c_void) -> LogEventHandler {
    let cookie = Cookie(cookie);
    Arc::new(move |event: &LogEvent<'_>| {
        let message = to_cstring(event.message);
        let logger_name = to_cstring(event.logger_name);
        let thread_id = to_cstring(event.thread_id);
        let thread_name = to_cstring(event.thread_name);
        let file = to_cstring(event.file);
        let function = to_cstring(event.function);

        // SAFETY: the registrant promised a callable function for this
        // signature; every pointer outlives the call
        unsafe {
            callback(
                cookie.get(),
                message.as_ptr(),
                logger_name.as_ptr(),
                event.level,
                thread_id.as_ptr(),
                thread_name.as_ptr(),
                event.timestamp_secs,
                event.timestamp_micros,
                file.as_ptr(),
                function.as_ptr(),
                event.line,
            );
        }
    })
}

/// Initialize the global engine
///
/// # Returns
/// A non-zero token to pass to [`rlb_deinitialize`], or 0 on failure
#[no_mangle]
pub extern "C" fn rlb_initialize() -> u64 {
    match Engine::global().initialize() {
        Ok(token) => token.as_raw(),
        Err(e) => {
            eprintln!("[LOGGER ERROR] initialize failed: {}", e);
            0
        }
    }
}

/// Release a token obtained from [`rlb_initialize`]
#[no_mangle]
pub extern "C" fn rlb_deinitialize(token: u64) -> c_int {
    status_of(&Engine::global().deinitialize(EngineToken::from_raw(token)))
}

/// Configure from a JSON file
///
/// # Safety
/// `path` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn rlb_file_configure(path: *const c_char) -> c_int {
    // SAFETY: forwarded caller contract
    let path = unsafe { read_str(path) };
    let result = required(path, "path")
        .and_then(|path| Engine::global().configure_from_file(&*path));
    status_of(&result)
}

/// Configure from an in-memory JSON document
///
/// # Safety
/// `config` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn rlb_str_configure(config: *const c_char) -> c_int {
    // SAFETY: forwarded caller contract
    let config = unsafe { read_str(config) };
    let result =
        required(config, "config").and_then(|text| Engine::global().configure_from_str(&text));
    status_of(&result)
}

/// Install a console appender on the root logger
#[no_mangle]
pub extern "C" fn rlb_basic_configure() -> c_int {
    status_of(&Engine::global().configure_basic())
}

/// Tear down the global engine regardless of outstanding tokens
#[no_mangle]
pub extern "C" fn rlb_shutdown() {
    Engine::global().shutdown();
}

/// Attach a callback appender to `logger_name`, or to root when it is null
/// or empty
///
/// # Safety
/// `logger_name` must be null or a valid NUL-terminated string. `callback`
/// and `cookie` must stay valid until the engine is torn down.
#[no_mangle]
pub unsafe extern "C" fn rlb_add_callback_appender(
    logger_name: *const c_char,
    callback: Option<LogEventCallback>,
    cookie: *mut c_void,
) -> c_int {
    // SAFETY: forwarded caller contract
    let name = unsafe { read_str(logger_name) };
    let handler = callback.map(|cb| foreign_handler(cb, cookie));
    status_of(&Engine::global().attach_callback(name.as_deref(), handler))
}

/// Log `msg` on logger `name` at wire level `level`
///
/// # Safety
/// `name` and `msg` must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn rlb_logger_log_str(
    name: *const c_char,
    level: c_int,
    msg: *const c_char,
) -> c_int {
    // SAFETY: forwarded caller contract
    let (name, msg) = unsafe { (read_str(name), read_str(msg)) };
    let result = required(msg, "msg")
        .and_then(|msg| Engine::global().log_str(name.as_deref(), level, &msg));
    status_of(&result)
}
