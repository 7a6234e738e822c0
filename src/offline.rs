use std::fmt::Write;

use chrono::{DateTime, Utc};

pub const SERVICE_WORKER: &str = "sw.js";

/// A service worker that precaches every exported route and serves from cache first.
/// The cache name changes with every build, so stale caches are dropped on activation.
pub fn service_worker<'a>(
    routes: impl IntoIterator<Item = &'a str>,
    built_at: DateTime<Utc>,
) -> String {
    let mut precache = String::new();
    for route in routes {
        let _ = writeln!(precache, "  {route:?},");
    }

    format!(
        r#"const CACHE = "folio-{}";
const PRECACHE = [
{precache}];

self.addEventListener("install", (event) => {{
  event.waitUntil(caches.open(CACHE).then((cache) => cache.addAll(PRECACHE)));
}});

self.addEventListener("activate", (event) => {{
  event.waitUntil(
    caches.keys().then((keys) =>
      Promise.all(keys.filter((key) => key !== CACHE).map((key) => caches.delete(key)))
    )
  );
}});

self.addEventListener("fetch", (event) => {{
  event.respondWith(
    caches.match(event.request).then((cached) => cached || fetch(event.request))
  );
}});
"#,
        built_at.timestamp()
    )
}
