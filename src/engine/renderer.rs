use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, WebGlBuffer, WebGlProgram,
    WebGlRenderingContext, WebGlTexture, WebGlUniformLocation,
};
use nalgebra::{Matrix4, Point3, Vector3};
use crate::engine::mesh::Mesh;

const MESH_VERTEX_SHADER: &str = r#"
    attribute vec3 aPosition;
    attribute vec3 aColor;
    attribute vec2 aTexCoord;
    uniform mat4 uModel;
    uniform mat4 uViewProjection;
    varying vec3 vColor;
    varying vec2 vTexCoord;
    varying vec3 vWorldPos;
    varying vec3 vNormal;
    void main() {
        vec4 world = uModel * vec4(aPosition, 1.0);
        gl_Position = uViewProjection * world;
        vWorldPos = world.xyz;
        // Lit meshes are unit spheres centered at the origin, so the
        // model-space position doubles as the normal.
        vNormal = (uModel * vec4(aPosition, 0.0)).xyz;
        vColor = aColor;
        vTexCoord = aTexCoord;
    }
"#;

const MESH_FRAGMENT_SHADER: &str = r#"
    precision mediump float;
    varying vec3 vColor;
    varying vec2 vTexCoord;
    varying vec3 vWorldPos;
    varying vec3 vNormal;
    uniform sampler2D uTexture;
    uniform int uUseTexture;
    uniform vec3 uUniformColor;
    uniform bool uUseUniformColor;
    uniform bool uUseLighting;
    uniform vec3 uAmbient;
    uniform vec3 uLightPos;
    uniform float uOpacity;
    void main() {
        vec3 color;
        if (uUseUniformColor) {
            color = uUniformColor;
        } else {
            color = vColor;
        }
        if (uUseTexture == 1) {
            color *= texture2D(uTexture, vTexCoord).rgb;
        }
        if (uUseLighting) {
            vec3 toLight = normalize(uLightPos - vWorldPos);
            float diffuse = max(dot(normalize(vNormal), toLight), 0.0);
            color *= uAmbient + vec3(diffuse);
        }
        gl_FragColor = vec4(color, uOpacity);
    }
"#;

const GLOW_VERTEX_SHADER: &str = r#"
    attribute vec3 aPosition;
    uniform mat4 uModel;
    uniform mat4 uViewProjection;
    uniform vec3 uViewVector;
    uniform float uBias;
    uniform float uPower;
    varying float vIntensity;
    void main() {
        vec4 world = uModel * vec4(aPosition, 1.0);
        vec3 normal = normalize((uModel * vec4(aPosition, 0.0)).xyz);
        vec3 viewDir = normalize(uViewVector - world.xyz);
        vIntensity = pow(max(uBias - dot(normal, viewDir), 0.0), uPower);
        gl_Position = uViewProjection * world;
    }
"#;

const GLOW_FRAGMENT_SHADER: &str = r#"
    precision mediump float;
    uniform vec3 uGlowColor;
    varying float vIntensity;
    void main() {
        gl_FragColor = vec4(uGlowColor * vIntensity, vIntensity);
    }
"#;

const POINT_VERTEX_SHADER: &str = r#"
    attribute vec3 aPosition;
    attribute float aOpacity;
    uniform mat4 uViewProjection;
    uniform float uPointSize;
    varying float vOpacity;
    void main() {
        gl_Position = uViewProjection * vec4(aPosition, 1.0);
        gl_PointSize = uPointSize;
        vOpacity = aOpacity;
    }
"#;

const POINT_FRAGMENT_SHADER: &str = r#"
    precision mediump float;
    uniform vec3 uColor;
    varying float vOpacity;
    void main() {
        gl_FragColor = vec4(uColor, vOpacity);
    }
"#;

#[derive(Clone, Copy, PartialEq)]
pub enum BlendMode {
    Opaque,
    Alpha,
    Additive,
}

struct MeshProgram {
    program: WebGlProgram,
    a_position: u32,
    a_color: u32,
    a_texcoord: u32,
    u_model: WebGlUniformLocation,
    u_view_projection: WebGlUniformLocation,
    u_use_texture: WebGlUniformLocation,
    u_uniform_color: WebGlUniformLocation,
    u_use_uniform_color: WebGlUniformLocation,
    u_use_lighting: WebGlUniformLocation,
    u_ambient: WebGlUniformLocation,
    u_light_pos: WebGlUniformLocation,
    u_opacity: WebGlUniformLocation,
}

struct GlowProgram {
    program: WebGlProgram,
    a_position: u32,
    u_model: WebGlUniformLocation,
    u_view_projection: WebGlUniformLocation,
    u_view_vector: WebGlUniformLocation,
    u_bias: WebGlUniformLocation,
    u_power: WebGlUniformLocation,
    u_glow_color: WebGlUniformLocation,
}

struct PointProgram {
    program: WebGlProgram,
    a_position: u32,
    a_opacity: u32,
    u_view_projection: WebGlUniformLocation,
    u_point_size: WebGlUniformLocation,
    u_color: WebGlUniformLocation,
}

/// A texture download in flight. Holding this keeps the callbacks alive;
/// `cancel` detaches them so a torn-down scene stops mutating GL state.
pub struct TextureLoad {
    img: HtmlImageElement,
    _onload: Closure<dyn FnMut()>,
    _onerror: Closure<dyn FnMut()>,
}

impl TextureLoad {
    pub fn cancel(&self) {
        self.img.set_onload(None);
        self.img.set_onerror(None);
        self.img.set_src("");
    }
}

pub struct Renderer {
    pub gl: WebGlRenderingContext,
    mesh_prog: MeshProgram,
    glow_prog: GlowProgram,
    point_prog: PointProgram,
    dynamic_vertex_buffer: WebGlBuffer,
    dynamic_index_buffer: WebGlBuffer,
    star_position_buffer: WebGlBuffer,
    star_opacity_buffer: WebGlBuffer,
    ambient: [f32; 3],
    light_pos: [f32; 3],
}

impl Renderer {
    pub fn new(gl: WebGlRenderingContext) -> Result<Self, JsValue> {
        let mesh_program = create_program(&gl, MESH_VERTEX_SHADER, MESH_FRAGMENT_SHADER)?;
        let glow_program = create_program(&gl, GLOW_VERTEX_SHADER, GLOW_FRAGMENT_SHADER)?;
        let point_program = create_program(&gl, POINT_VERTEX_SHADER, POINT_FRAGMENT_SHADER)?;

        let mesh_prog = MeshProgram {
            a_position: attrib_location(&gl, &mesh_program, "aPosition")?,
            a_color: attrib_location(&gl, &mesh_program, "aColor")?,
            a_texcoord: attrib_location(&gl, &mesh_program, "aTexCoord")?,
            u_model: uniform_location(&gl, &mesh_program, "uModel")?,
            u_view_projection: uniform_location(&gl, &mesh_program, "uViewProjection")?,
            u_use_texture: uniform_location(&gl, &mesh_program, "uUseTexture")?,
            u_uniform_color: uniform_location(&gl, &mesh_program, "uUniformColor")?,
            u_use_uniform_color: uniform_location(&gl, &mesh_program, "uUseUniformColor")?,
            u_use_lighting: uniform_location(&gl, &mesh_program, "uUseLighting")?,
            u_ambient: uniform_location(&gl, &mesh_program, "uAmbient")?,
            u_light_pos: uniform_location(&gl, &mesh_program, "uLightPos")?,
            u_opacity: uniform_location(&gl, &mesh_program, "uOpacity")?,
            program: mesh_program,
        };

        let glow_prog = GlowProgram {
            a_position: attrib_location(&gl, &glow_program, "aPosition")?,
            u_model: uniform_location(&gl, &glow_program, "uModel")?,
            u_view_projection: uniform_location(&gl, &glow_program, "uViewProjection")?,
            u_view_vector: uniform_location(&gl, &glow_program, "uViewVector")?,
            u_bias: uniform_location(&gl, &glow_program, "uBias")?,
            u_power: uniform_location(&gl, &glow_program, "uPower")?,
            u_glow_color: uniform_location(&gl, &glow_program, "uGlowColor")?,
            program: glow_program,
        };

        let point_prog = PointProgram {
            a_position: attrib_location(&gl, &point_program, "aPosition")?,
            a_opacity: attrib_location(&gl, &point_program, "aOpacity")?,
            u_view_projection: uniform_location(&gl, &point_program, "uViewProjection")?,
            u_point_size: uniform_location(&gl, &point_program, "uPointSize")?,
            u_color: uniform_location(&gl, &point_program, "uColor")?,
            program: point_program,
        };

        let dynamic_vertex_buffer = gl.create_buffer().ok_or("Failed to create buffer")?;
        let dynamic_index_buffer = gl.create_buffer().ok_or("Failed to create buffer")?;
        let star_position_buffer = gl.create_buffer().ok_or("Failed to create buffer")?;
        let star_opacity_buffer = gl.create_buffer().ok_or("Failed to create buffer")?;

        Ok(Renderer {
            gl,
            mesh_prog,
            glow_prog,
            point_prog,
            dynamic_vertex_buffer,
            dynamic_index_buffer,
            star_position_buffer,
            star_opacity_buffer,
            ambient: [0.25, 0.25, 0.25],
            light_pos: [0.0, 0.0, 0.0],
        })
    }

    pub fn set_lighting(&mut self, ambient: [f32; 3], light_pos: [f32; 3]) {
        self.ambient = ambient;
        self.light_pos = light_pos;
    }

    pub fn clear(&self, r: f32, g: f32, b: f32) {
        self.gl.clear_color(r, g, b, 1.0);
        self.gl
            .clear(WebGlRenderingContext::COLOR_BUFFER_BIT | WebGlRenderingContext::DEPTH_BUFFER_BIT);
    }

    pub fn enable_depth_test(&self) {
        self.gl.enable(WebGlRenderingContext::DEPTH_TEST);
    }

    pub fn resize(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
    }

    pub fn canvas(&self) -> Option<HtmlCanvasElement> {
        self.gl.canvas()?.dyn_into::<HtmlCanvasElement>().ok()
    }

    pub fn draw_mesh(
        &self,
        mesh: &Mesh,
        x: f32,
        y: f32,
        z: f32,
        scale: f32,
        rotation_x: f32,
        rotation_y: f32,
        rotation_z: f32,
        view_projection: &Matrix4<f32>,
        texture: Option<&WebGlTexture>,
        lit: bool,
    ) {
        let model = Matrix4::new_translation(&Vector3::new(x, y, z))
            * Matrix4::from_euler_angles(rotation_x, rotation_y, rotation_z)
            * Matrix4::new_scaling(scale);
        self.draw_mesh_with_model(mesh, &model, view_projection, texture, lit, 1.0, BlendMode::Opaque);
    }

    pub fn draw_mesh_with_model(
        &self,
        mesh: &Mesh,
        model: &Matrix4<f32>,
        view_projection: &Matrix4<f32>,
        texture: Option<&WebGlTexture>,
        lit: bool,
        opacity: f32,
        blend: BlendMode,
    ) {
        let gl = &self.gl;
        let p = &self.mesh_prog;
        gl.use_program(Some(&p.program));

        gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.dynamic_vertex_buffer));
        unsafe {
            let vert_array = js_sys::Float32Array::view(&mesh.vertices);
            gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &vert_array,
                WebGlRenderingContext::DYNAMIC_DRAW,
            );
        }

        gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&self.dynamic_index_buffer));
        unsafe {
            let idx_array = js_sys::Uint16Array::view(&mesh.indices);
            gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ELEMENT_ARRAY_BUFFER,
                &idx_array,
                WebGlRenderingContext::DYNAMIC_DRAW,
            );
        }

        gl.vertex_attrib_pointer_with_i32(p.a_position, 3, WebGlRenderingContext::FLOAT, false, 32, 0);
        gl.enable_vertex_attrib_array(p.a_position);
        gl.vertex_attrib_pointer_with_i32(p.a_color, 3, WebGlRenderingContext::FLOAT, false, 32, 12);
        gl.enable_vertex_attrib_array(p.a_color);
        gl.vertex_attrib_pointer_with_i32(p.a_texcoord, 2, WebGlRenderingContext::FLOAT, false, 32, 24);
        gl.enable_vertex_attrib_array(p.a_texcoord);

        if let Some(tex) = texture {
            gl.active_texture(WebGlRenderingContext::TEXTURE0);
            gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(tex));
            gl.uniform1i(Some(&p.u_use_texture), 1);
        } else {
            gl.uniform1i(Some(&p.u_use_texture), 0);
        }
        gl.uniform1i(Some(&p.u_use_uniform_color), 0);
        gl.uniform1i(Some(&p.u_use_lighting), lit as i32);
        gl.uniform3f(Some(&p.u_ambient), self.ambient[0], self.ambient[1], self.ambient[2]);
        gl.uniform3f(Some(&p.u_light_pos), self.light_pos[0], self.light_pos[1], self.light_pos[2]);
        gl.uniform1f(Some(&p.u_opacity), opacity);

        let model_array: [f32; 16] = model.as_slice().try_into().unwrap();
        gl.uniform_matrix4fv_with_f32_array(Some(&p.u_model), false, &model_array);
        let vp_array: [f32; 16] = view_projection.as_slice().try_into().unwrap();
        gl.uniform_matrix4fv_with_f32_array(Some(&p.u_view_projection), false, &vp_array);

        self.apply_blend(blend);
        gl.draw_elements_with_i32(
            WebGlRenderingContext::TRIANGLES,
            mesh.indices.len() as i32,
            WebGlRenderingContext::UNSIGNED_SHORT,
            0,
        );
        self.restore_blend();
    }

    pub fn draw_glow(
        &self,
        mesh: &Mesh,
        model: &Matrix4<f32>,
        view_projection: &Matrix4<f32>,
        eye: Point3<f32>,
        bias: f32,
        power: f32,
        color: (f32, f32, f32),
    ) {
        let gl = &self.gl;
        let p = &self.glow_prog;
        gl.use_program(Some(&p.program));

        gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.dynamic_vertex_buffer));
        unsafe {
            let vert_array = js_sys::Float32Array::view(&mesh.vertices);
            gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &vert_array,
                WebGlRenderingContext::DYNAMIC_DRAW,
            );
        }
        gl.bind_buffer(WebGlRenderingContext::ELEMENT_ARRAY_BUFFER, Some(&self.dynamic_index_buffer));
        unsafe {
            let idx_array = js_sys::Uint16Array::view(&mesh.indices);
            gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ELEMENT_ARRAY_BUFFER,
                &idx_array,
                WebGlRenderingContext::DYNAMIC_DRAW,
            );
        }

        gl.vertex_attrib_pointer_with_i32(p.a_position, 3, WebGlRenderingContext::FLOAT, false, 32, 0);
        gl.enable_vertex_attrib_array(p.a_position);
        gl.disable_vertex_attrib_array(self.mesh_prog.a_color);
        gl.disable_vertex_attrib_array(self.mesh_prog.a_texcoord);

        gl.uniform3f(Some(&p.u_view_vector), eye.x, eye.y, eye.z);
        gl.uniform1f(Some(&p.u_bias), bias);
        gl.uniform1f(Some(&p.u_power), power);
        gl.uniform3f(Some(&p.u_glow_color), color.0, color.1, color.2);

        let model_array: [f32; 16] = model.as_slice().try_into().unwrap();
        gl.uniform_matrix4fv_with_f32_array(Some(&p.u_model), false, &model_array);
        let vp_array: [f32; 16] = view_projection.as_slice().try_into().unwrap();
        gl.uniform_matrix4fv_with_f32_array(Some(&p.u_view_projection), false, &vp_array);

        self.apply_blend(BlendMode::Additive);
        gl.draw_elements_with_i32(
            WebGlRenderingContext::TRIANGLES,
            mesh.indices.len() as i32,
            WebGlRenderingContext::UNSIGNED_SHORT,
            0,
        );
        self.restore_blend();
    }

    pub fn draw_lines(
        &self,
        vertices: &[f32],
        r: f32,
        g: f32,
        b: f32,
        opacity: f32,
        view_projection: &Matrix4<f32>,
    ) {
        let gl = &self.gl;
        let p = &self.mesh_prog;
        gl.use_program(Some(&p.program));

        gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.dynamic_vertex_buffer));
        unsafe {
            let vert_array = js_sys::Float32Array::view(vertices);
            gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &vert_array,
                WebGlRenderingContext::DYNAMIC_DRAW,
            );
        }

        gl.vertex_attrib_pointer_with_i32(p.a_position, 3, WebGlRenderingContext::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(p.a_position);
        gl.disable_vertex_attrib_array(p.a_color);
        gl.disable_vertex_attrib_array(p.a_texcoord);

        gl.uniform1i(Some(&p.u_use_uniform_color), 1);
        gl.uniform1i(Some(&p.u_use_texture), 0);
        gl.uniform1i(Some(&p.u_use_lighting), 0);
        gl.uniform3f(Some(&p.u_uniform_color), r, g, b);
        gl.uniform1f(Some(&p.u_opacity), opacity);

        let identity: [f32; 16] = Matrix4::identity().as_slice().try_into().unwrap();
        gl.uniform_matrix4fv_with_f32_array(Some(&p.u_model), false, &identity);
        let vp_array: [f32; 16] = view_projection.as_slice().try_into().unwrap();
        gl.uniform_matrix4fv_with_f32_array(Some(&p.u_view_projection), false, &vp_array);

        self.apply_blend(BlendMode::Alpha);
        gl.draw_arrays(WebGlRenderingContext::LINE_STRIP, 0, (vertices.len() / 3) as i32);
        self.restore_blend();
    }

    pub fn upload_star_positions(&self, positions: &[f32]) {
        let gl = &self.gl;
        gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.star_position_buffer));
        unsafe {
            let array = js_sys::Float32Array::view(positions);
            gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &array,
                WebGlRenderingContext::STATIC_DRAW,
            );
        }
    }

    pub fn draw_stars(
        &self,
        opacities: &[f32],
        view_projection: &Matrix4<f32>,
        point_size: f32,
        color: (f32, f32, f32),
    ) {
        let gl = &self.gl;
        let p = &self.point_prog;
        gl.use_program(Some(&p.program));

        gl.disable_vertex_attrib_array(self.mesh_prog.a_color);
        gl.disable_vertex_attrib_array(self.mesh_prog.a_texcoord);

        gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.star_position_buffer));
        gl.vertex_attrib_pointer_with_i32(p.a_position, 3, WebGlRenderingContext::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(p.a_position);

        gl.bind_buffer(WebGlRenderingContext::ARRAY_BUFFER, Some(&self.star_opacity_buffer));
        unsafe {
            let array = js_sys::Float32Array::view(opacities);
            gl.buffer_data_with_array_buffer_view(
                WebGlRenderingContext::ARRAY_BUFFER,
                &array,
                WebGlRenderingContext::DYNAMIC_DRAW,
            );
        }
        gl.vertex_attrib_pointer_with_i32(p.a_opacity, 1, WebGlRenderingContext::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(p.a_opacity);

        gl.uniform1f(Some(&p.u_point_size), point_size);
        gl.uniform3f(Some(&p.u_color), color.0, color.1, color.2);
        let vp_array: [f32; 16] = view_projection.as_slice().try_into().unwrap();
        gl.uniform_matrix4fv_with_f32_array(Some(&p.u_view_projection), false, &vp_array);

        gl.depth_mask(false);
        gl.enable(WebGlRenderingContext::BLEND);
        gl.blend_func(WebGlRenderingContext::SRC_ALPHA, WebGlRenderingContext::ONE);
        gl.draw_arrays(WebGlRenderingContext::POINTS, 0, (opacities.len()) as i32);
        gl.disable(WebGlRenderingContext::BLEND);
        gl.depth_mask(true);
    }

    fn apply_blend(&self, blend: BlendMode) {
        let gl = &self.gl;
        match blend {
            BlendMode::Opaque => gl.disable(WebGlRenderingContext::BLEND),
            BlendMode::Alpha => {
                gl.enable(WebGlRenderingContext::BLEND);
                gl.blend_func(
                    WebGlRenderingContext::SRC_ALPHA,
                    WebGlRenderingContext::ONE_MINUS_SRC_ALPHA,
                );
            }
            BlendMode::Additive => {
                gl.enable(WebGlRenderingContext::BLEND);
                gl.blend_func(WebGlRenderingContext::ONE, WebGlRenderingContext::ONE);
                gl.depth_mask(false);
            }
        }
    }

    fn restore_blend(&self) {
        self.gl.disable(WebGlRenderingContext::BLEND);
        self.gl.depth_mask(true);
    }

    /// Starts an asynchronous image download for `url`. The returned texture
    /// holds a single placeholder pixel until the image arrives, so meshes can
    /// be drawn immediately. Failure keeps the placeholder and logs a warning.
    pub fn create_texture(
        &self,
        url: &str,
        placeholder: [u8; 4],
    ) -> Result<(WebGlTexture, TextureLoad), JsValue> {
        let texture = self.gl.create_texture().ok_or("Failed to create texture")?;
        self.gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(&texture));

        self.gl
            .tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
                WebGlRenderingContext::TEXTURE_2D,
                0,
                WebGlRenderingContext::RGBA as i32,
                1,
                1,
                0,
                WebGlRenderingContext::RGBA,
                WebGlRenderingContext::UNSIGNED_BYTE,
                Some(&placeholder),
            )?;

        let img = HtmlImageElement::new()?;
        img.set_cross_origin(Some("anonymous"));

        let gl = self.gl.clone();
        let texture_clone = texture.clone();
        let img_clone = img.clone();
        let load_url = url.to_string();

        let onload = Closure::wrap(Box::new(move || {
            gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(&texture_clone));
            if let Err(err) = gl.tex_image_2d_with_u32_and_u32_and_image(
                WebGlRenderingContext::TEXTURE_2D,
                0,
                WebGlRenderingContext::RGBA as i32,
                WebGlRenderingContext::RGBA,
                WebGlRenderingContext::UNSIGNED_BYTE,
                &img_clone,
            ) {
                log::warn!("texture upload failed for {load_url}: {err:?}");
                return;
            }
            if is_power_of_2(img_clone.width()) && is_power_of_2(img_clone.height()) {
                gl.generate_mipmap(WebGlRenderingContext::TEXTURE_2D);
            } else {
                set_non_pow2_params(&gl);
            }
        }) as Box<dyn FnMut()>);

        let error_url = url.to_string();
        let onerror = Closure::wrap(Box::new(move || {
            log::warn!("failed to load texture {error_url}; keeping placeholder");
        }) as Box<dyn FnMut()>);

        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        img.set_src(url);

        Ok((
            texture,
            TextureLoad {
                img,
                _onload: onload,
                _onerror: onerror,
            },
        ))
    }

    /// Rasterizes `text` onto an offscreen 2D canvas and uploads it as a
    /// texture. Synchronous, so labels never go through the placeholder state.
    pub fn create_label_texture(&self, text: &str) -> Result<WebGlTexture, JsValue> {
        let document = web_sys::window()
            .ok_or("No window")?
            .document()
            .ok_or("No document")?;
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        canvas.set_width(640);
        canvas.set_height(128);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("No 2d context")?
            .dyn_into()?;
        ctx.set_fill_style_str("#a02020");
        ctx.fill_rect(0.0, 0.0, 640.0, 128.0);
        ctx.set_fill_style_str("#ffffff");
        ctx.set_font("80px Arial");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.fill_text(text, 320.0, 64.0)?;

        let texture = self.gl.create_texture().ok_or("Failed to create texture")?;
        self.gl.bind_texture(WebGlRenderingContext::TEXTURE_2D, Some(&texture));
        self.gl.tex_image_2d_with_u32_and_u32_and_canvas(
            WebGlRenderingContext::TEXTURE_2D,
            0,
            WebGlRenderingContext::RGBA as i32,
            WebGlRenderingContext::RGBA,
            WebGlRenderingContext::UNSIGNED_BYTE,
            &canvas,
        )?;
        set_non_pow2_params(&self.gl);

        Ok(texture)
    }
}

fn set_non_pow2_params(gl: &WebGlRenderingContext) {
    gl.tex_parameteri(
        WebGlRenderingContext::TEXTURE_2D,
        WebGlRenderingContext::TEXTURE_WRAP_S,
        WebGlRenderingContext::CLAMP_TO_EDGE as i32,
    );
    gl.tex_parameteri(
        WebGlRenderingContext::TEXTURE_2D,
        WebGlRenderingContext::TEXTURE_WRAP_T,
        WebGlRenderingContext::CLAMP_TO_EDGE as i32,
    );
    gl.tex_parameteri(
        WebGlRenderingContext::TEXTURE_2D,
        WebGlRenderingContext::TEXTURE_MIN_FILTER,
        WebGlRenderingContext::LINEAR as i32,
    );
}

fn is_power_of_2(value: u32) -> bool {
    (value & (value - 1)) == 0
}

fn attrib_location(
    gl: &WebGlRenderingContext,
    program: &WebGlProgram,
    name: &str,
) -> Result<u32, JsValue> {
    let location = gl.get_attrib_location(program, name);
    if location < 0 {
        return Err(JsValue::from_str(&format!("Missing attribute {name}")));
    }
    Ok(location as u32)
}

fn uniform_location(
    gl: &WebGlRenderingContext,
    program: &WebGlProgram,
    name: &str,
) -> Result<WebGlUniformLocation, JsValue> {
    gl.get_uniform_location(program, name)
        .ok_or_else(|| JsValue::from_str(&format!("Missing uniform {name}")))
}

fn create_program(
    gl: &WebGlRenderingContext,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<WebGlProgram, JsValue> {
    let vert_shader = compile_shader(gl, WebGlRenderingContext::VERTEX_SHADER, vertex_source)?;
    let frag_shader = compile_shader(gl, WebGlRenderingContext::FRAGMENT_SHADER, fragment_source)?;

    let program = gl.create_program().ok_or("Unable to create program")?;
    gl.attach_shader(&program, &vert_shader);
    gl.attach_shader(&program, &frag_shader);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, WebGlRenderingContext::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        Err(JsValue::from_str(
            &gl.get_program_info_log(&program).unwrap_or_default(),
        ))
    }
}

fn compile_shader(
    gl: &WebGlRenderingContext,
    shader_type: u32,
    source: &str,
) -> Result<web_sys::WebGlShader, JsValue> {
    let shader = gl.create_shader(shader_type).ok_or("Unable to create shader")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, WebGlRenderingContext::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        Err(JsValue::from_str(
            &gl.get_shader_info_log(&shader).unwrap_or_default(),
        ))
    }
}
