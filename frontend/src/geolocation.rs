use chrono::{DateTime, Utc};
use gloo_utils::window;
use guardian_lib::{
    navigation::LocationSource,
    position::{Position, PositionError},
};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    Geolocation, Position as GeolocationPosition, PositionError as GeolocationPositionError, PositionOptions,
};
use yew::Callback;

type FixClosure = Closure<dyn FnMut(GeolocationPosition)>;
type ErrorClosure = Closure<dyn FnMut(GeolocationPositionError)>;

/// The browser's continuous location feed. Every fix or failure is handed to `on_fix`.
pub struct BrowserLocation {
    on_fix: Callback<Result<Position, PositionError>>,
    watch: Option<(Geolocation, i32)>,
    // Kept alive for as long as the watch runs
    _closures: Option<(FixClosure, ErrorClosure)>,
}

impl BrowserLocation {
    pub fn new(on_fix: Callback<Result<Position, PositionError>>) -> Self {
        Self {
            on_fix,
            watch: None,
            _closures: None,
        }
    }
}

fn to_position(fix: &GeolocationPosition) -> Result<Position, PositionError> {
    let coords = fix.coords();
    let timestamp = DateTime::<Utc>::from_timestamp_millis(fix.timestamp() as i64).unwrap_or_else(Utc::now);
    Position::new(coords.latitude(), coords.longitude(), timestamp)
}

fn to_error(err: &GeolocationPositionError) -> PositionError {
    if err.code() == GeolocationPositionError::PERMISSION_DENIED {
        PositionError::PermissionDenied
    } else {
        PositionError::Unavailable(err.message())
    }
}

impl LocationSource for BrowserLocation {
    fn watch(&mut self) -> Result<(), PositionError> {
        if self.watch.is_some() {
            return Ok(());
        }

        let geolocation = window()
            .navigator()
            .geolocation()
            .map_err(|_| PositionError::Unsupported)?;

        let on_fix = self.on_fix.clone();
        let fix_closure = FixClosure::new(move |fix: GeolocationPosition| on_fix.emit(to_position(&fix)));

        let on_error = self.on_fix.clone();
        let error_closure = ErrorClosure::new(move |err: GeolocationPositionError| on_error.emit(Err(to_error(&err))));

        let options = PositionOptions::new();
        options.set_enable_high_accuracy(true);

        let id = geolocation
            .watch_position_with_error_callback_and_options(
                fix_closure.as_ref().unchecked_ref(),
                Some(error_closure.as_ref().unchecked_ref()),
                &options,
            )
            .map_err(|_| PositionError::Unsupported)?;

        self.watch = Some((geolocation, id));
        self._closures = Some((fix_closure, error_closure));
        Ok(())
    }
}

impl Drop for BrowserLocation {
    fn drop(&mut self) {
        if let Some((geolocation, id)) = self.watch.take() {
            geolocation.clear_watch(id);
        }
    }
}
