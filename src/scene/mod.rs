pub mod content;
pub mod picking;
pub mod planets;
pub mod starfield;

use nalgebra::{Matrix4, Point3, Vector3};
use wasm_bindgen::JsValue;
use web_sys::{HtmlCanvasElement, WebGlTexture};

use crate::engine::camera::Camera;
use crate::engine::mesh::Mesh;
use crate::engine::renderer::{BlendMode, Renderer, TextureLoad};
use self::content::TextDictionary;
use self::planets::{orbital_angle, planet_position, sun_angle, PlanetSpec, LABEL_ALTITUDE, PLANETS};
use self::starfield::StarField;

const SUN_TEXTURE_URL: &str = "/sun.jpg";
const FLARE_TEXTURE_URL: &str = "/flare.jpg";
const GALAXY_TEXTURE_URL: &str = "/galaxy.jpg";

const SUN_RADIUS: f32 = 5.0;
const GLOW_RADIUS: f32 = 5.5;
const GLOW_BIAS: f32 = 0.3;
const GLOW_POWER: f32 = 2.0;
const GLOW_COLOR: (f32, f32, f32) = (1.0, 1.0, 0.0);
const GALAXY_RADIUS: f32 = 1000.0;
const FLARE_SIZE: f32 = 30.0;
const ORBIT_SEGMENTS: usize = 64;
const STAR_POINT_SIZE: f32 = 2.0;
const AMBIENT_LIGHT: [f32; 3] = [0.25, 0.25, 0.25];

pub struct PlanetInstance {
    pub spec: &'static PlanetSpec,
    pub position: Point3<f32>,
    pub angle: f32,
    texture: WebGlTexture,
    label_texture: WebGlTexture,
}

pub struct SolarScene {
    renderer: Renderer,
    camera: Camera,
    planets: Vec<PlanetInstance>,
    stars: StarField,
    content: TextDictionary,
    selected: Option<String>,

    sphere: Mesh,
    label_quad: Mesh,
    flare_quad: Mesh,
    decor_ring: Mesh,
    orbit_circles: Vec<Vec<f32>>,

    sun_texture: WebGlTexture,
    flare_texture: WebGlTexture,
    galaxy_texture: WebGlTexture,
    texture_loads: Vec<TextureLoad>,

    sun_rotation: f32,
    width: f32,
    height: f32,
    drag_anchor: Option<(i32, i32)>,
}

impl SolarScene {
    pub fn new(
        mut renderer: Renderer,
        content: TextDictionary,
        width: f32,
        height: f32,
        star_seed: u64,
    ) -> Result<Self, JsValue> {
        renderer.set_lighting(AMBIENT_LIGHT, [0.0, 0.0, 0.0]);

        let mut texture_loads = Vec::new();
        let (galaxy_texture, load) = renderer.create_texture(GALAXY_TEXTURE_URL, [4, 4, 12, 255])?;
        texture_loads.push(load);
        let (sun_texture, load) = renderer.create_texture(SUN_TEXTURE_URL, [255, 176, 64, 255])?;
        texture_loads.push(load);
        // Black placeholder: an additive flare contributes nothing until loaded.
        let (flare_texture, load) = renderer.create_texture(FLARE_TEXTURE_URL, [0, 0, 0, 255])?;
        texture_loads.push(load);

        let mut planet_instances = Vec::with_capacity(PLANETS.len());
        for (index, spec) in PLANETS.iter().enumerate() {
            let (texture, load) = renderer.create_texture(spec.texture_url, [110, 110, 110, 255])?;
            texture_loads.push(load);
            let label_texture = renderer.create_label_texture(spec.name)?;
            let p = planet_position(spec, 0.0, index);
            planet_instances.push(PlanetInstance {
                spec,
                position: Point3::new(p[0], p[1], p[2]),
                angle: 0.0,
                texture,
                label_texture,
            });
        }

        let ringed = PLANETS
            .iter()
            .find(|spec| spec.ring)
            .ok_or("No ringed planet configured")?;
        let decor_ring = Mesh::ring(ringed.size * 1.5, ringed.size * 2.5, 64, 1.0, 0.647, 0.0);

        let orbit_circles = PLANETS.iter().map(|spec| orbit_circle(spec.distance)).collect();

        let stars = StarField::generate(star_seed);
        renderer.upload_star_positions(&stars.positions);

        Ok(SolarScene {
            renderer,
            camera: Camera::new(width, height),
            planets: planet_instances,
            stars,
            content,
            selected: None,
            sphere: Mesh::sphere(1.0, 32, 32, 1.0, 1.0, 1.0),
            label_quad: Mesh::quad(5.0, 1.0),
            flare_quad: Mesh::quad(1.0, 1.0),
            decor_ring,
            orbit_circles,
            sun_texture,
            flare_texture,
            galaxy_texture,
            texture_loads,
            sun_rotation: 0.0,
            width,
            height,
            drag_anchor: None,
        })
    }

    /// Advance every animated quantity to `now_ms`. Stateless with respect to
    /// previous ticks: the same timestamp always produces the same scene.
    pub fn update(&mut self, now_ms: f64) {
        for (index, planet) in self.planets.iter_mut().enumerate() {
            let p = planet_position(planet.spec, now_ms, index);
            planet.position = Point3::new(p[0], p[1], p[2]);
            planet.angle = orbital_angle(now_ms, index);
        }
        self.sun_rotation = sun_angle(now_ms);
        self.stars.update_opacities(now_ms);
    }

    pub fn render(&self) {
        let r = &self.renderer;
        r.clear(0.0, 0.0, 0.0);
        r.enable_depth_test();

        let vp = self.camera.view_projection();
        let eye = self.camera.eye();

        // Background sphere, seen from the inside.
        r.draw_mesh(&self.sphere, 0.0, 0.0, 0.0, GALAXY_RADIUS, 0.0, 0.0, 0.0, &vp, Some(&self.galaxy_texture), false);

        for circle in &self.orbit_circles {
            r.draw_lines(circle, 1.0, 1.0, 1.0, 0.5, &vp);
        }

        r.draw_mesh(&self.sphere, 0.0, 0.0, 0.0, SUN_RADIUS, 0.0, self.sun_rotation, 0.0, &vp, Some(&self.sun_texture), false);
        let glow_model = Matrix4::new_scaling(GLOW_RADIUS);
        r.draw_glow(&self.sphere, &glow_model, &vp, eye, GLOW_BIAS, GLOW_POWER, GLOW_COLOR);
        let flare_model = self.camera.billboard_model(Point3::origin(), FLARE_SIZE);
        r.draw_mesh_with_model(&self.flare_quad, &flare_model, &vp, Some(&self.flare_texture), false, 1.0, BlendMode::Additive);

        for planet in &self.planets {
            let pos = planet.position;
            r.draw_mesh(&self.sphere, pos.x, pos.y, pos.z, planet.spec.size, 0.0, 0.0, 0.0, &vp, Some(&planet.texture), true);

            if planet.spec.ring {
                let ring_model = Matrix4::new_translation(&Vector3::new(pos.x, pos.y, pos.z))
                    * Matrix4::from_euler_angles(std::f32::consts::FRAC_PI_3, 0.0, 0.0);
                r.draw_mesh_with_model(&self.decor_ring, &ring_model, &vp, None, false, 1.0, BlendMode::Opaque);
            }

            let label_model =
                Matrix4::new_translation(&Vector3::new(pos.x, planet.spec.size + LABEL_ALTITUDE, pos.z))
                    * Matrix4::from_euler_angles(0.0, -planet.angle, 0.0);
            r.draw_mesh_with_model(&self.label_quad, &label_model, &vp, Some(&planet.label_texture), false, 1.0, BlendMode::Opaque);
        }

        r.draw_stars(&self.stars.opacities, &vp, STAR_POINT_SIZE, (1.0, 1.0, 1.0));
    }

    /// Resolve a viewport click against the planet meshes only. A hit updates
    /// the selection; a miss leaves it as it was.
    pub fn handle_click(&mut self, x: f32, y: f32) {
        let ray = match self.camera.screen_ray(x, y, self.width, self.height) {
            Some(ray) => ray,
            None => return,
        };
        let targets: Vec<(Point3<f32>, f32)> = self
            .planets
            .iter()
            .map(|planet| (planet.position, planet.spec.size))
            .collect();
        let hit = picking::pick_nearest(&ray, &targets).map(|index| self.planets[index].spec.name);
        picking::apply_pick(&mut self.selected, hit);
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn section_text(&self, name: &str) -> Option<&str> {
        self.content.lookup(name)
    }

    pub fn handle_resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.camera.set_viewport(width, height);
        self.renderer.resize(width as i32, height as i32);
    }

    pub fn handle_mouse_down(&mut self, x: i32, y: i32) {
        self.drag_anchor = Some((x, y));
    }

    pub fn handle_mouse_up(&mut self) {
        self.drag_anchor = None;
    }

    pub fn handle_mouse_move(&mut self, x: i32, y: i32) {
        if let Some((last_x, last_y)) = self.drag_anchor {
            self.camera.orbit((x - last_x) as f32, (y - last_y) as f32);
            self.drag_anchor = Some((x, y));
        }
    }

    pub fn handle_wheel(&mut self, delta: f32) {
        self.camera.zoom(delta);
    }

    /// Detach the callbacks of every in-flight texture download so a torn-down
    /// scene stops receiving completions.
    pub fn cancel_pending_loads(&mut self) {
        for load in &self.texture_loads {
            load.cancel();
        }
        self.texture_loads.clear();
    }

    pub fn canvas(&self) -> Option<HtmlCanvasElement> {
        self.renderer.canvas()
    }
}

fn orbit_circle(distance: f32) -> Vec<f32> {
    let mut points = Vec::with_capacity((ORBIT_SEGMENTS + 1) * 3);
    for segment in 0..=ORBIT_SEGMENTS {
        let angle = segment as f32 * 2.0 * std::f32::consts::PI / ORBIT_SEGMENTS as f32;
        points.push(distance * angle.cos());
        points.push(0.0);
        points.push(distance * angle.sin());
    }
    points
}
