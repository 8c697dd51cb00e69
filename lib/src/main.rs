#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use mobilenet_serve::MobileNet;

mobilenet_serve::start!(MobileNet);
